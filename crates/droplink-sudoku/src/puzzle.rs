//! Puzzle creation by removing cells from a complete grid.

use std::{fmt, str::FromStr};

use droplink_core::Position;
use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{SudokuGrid, SudokuSize, count_solutions, generate_complete_sudoku};

/// Named difficulty for standalone Sudoku puzzles.
///
/// The difficulty fixes how many cells are removed from a 9×9 solution; other
/// sizes scale the count by cell area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SudokuDifficulty {
    /// 35 cells removed on 9×9.
    Easy,
    /// 45 cells removed on 9×9.
    Medium,
    /// 55 cells removed on 9×9.
    Hard,
}

impl SudokuDifficulty {
    /// All difficulties from easiest to hardest.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Returns the number of cells removed on a 9×9 board.
    #[must_use]
    pub const fn removals_on_nine(self) -> usize {
        match self {
            Self::Easy => 35,
            Self::Medium => 45,
            Self::Hard => 55,
        }
    }

    /// Returns the number of cells to remove on a board of `size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use droplink_sudoku::{SudokuDifficulty, SudokuSize};
    ///
    /// assert_eq!(SudokuDifficulty::Easy.removals(SudokuSize::NINE), 35);
    /// assert_eq!(SudokuDifficulty::Easy.removals(SudokuSize::FOUR), 7);
    /// ```
    #[must_use]
    pub fn removals(self, size: SudokuSize) -> usize {
        let nine = SudokuSize::NINE.cell_count();
        (self.removals_on_nine() * size.cell_count() + nine / 2) / nine
    }
}

impl fmt::Display for SudokuDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

/// Error returned when parsing an unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown sudoku difficulty {name:?}")]
pub struct ParseDifficultyError {
    name: String,
}

impl FromStr for SudokuDifficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDifficultyError { name: s.to_owned() })
    }
}

/// Options controlling how cells are removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleOptions {
    /// Only remove a cell if the puzzle keeps exactly one solution.
    ///
    /// When enabled, fewer cells than requested may be removed. Disabled by
    /// default: removed cells are sampled uniformly without checking uniqueness.
    pub require_unique: bool,
}

impl PuzzleOptions {
    /// Sets [`PuzzleOptions::require_unique`].
    #[must_use]
    pub fn require_unique(mut self, require_unique: bool) -> Self {
        self.require_unique = require_unique;
        self
    }
}

/// A puzzle together with the complete grid it was cut from.
///
/// Every filled cell of `puzzle` equals the same cell of `solution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuPuzzle {
    /// The grid shown to the player.
    pub puzzle: SudokuGrid,
    /// The complete grid the puzzle was derived from.
    pub solution: SudokuGrid,
}

impl SudokuPuzzle {
    /// Generates a complete grid of `size` and removes `removals` cells from it.
    ///
    /// `removals` is clamped to the number of cells.
    pub fn generate<R>(
        size: SudokuSize,
        removals: usize,
        options: PuzzleOptions,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let solution = generate_complete_sudoku(size, rng);
        let puzzle = punch_holes(&solution, removals, options, rng);
        Self { puzzle, solution }
    }

    /// Returns the number of unfilled cells in the puzzle.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.puzzle.empty_count()
    }
}

/// Generates a 9×9 puzzle of the named difficulty.
///
/// Uniqueness of the puzzle's solution is not enforced; see
/// [`PuzzleOptions::require_unique`] for the stricter variant.
///
/// # Examples
///
/// ```
/// use droplink_sudoku::{SudokuDifficulty, generate_sudoku_puzzle};
///
/// let generated = generate_sudoku_puzzle(SudokuDifficulty::Easy, &mut rand::rng());
/// assert_eq!(generated.puzzle.empty_count(), 35);
/// assert_eq!(generated.puzzle.filled_count(), 46);
/// ```
pub fn generate_sudoku_puzzle<R>(difficulty: SudokuDifficulty, rng: &mut R) -> SudokuPuzzle
where
    R: Rng + ?Sized,
{
    SudokuPuzzle::generate(
        SudokuSize::NINE,
        difficulty.removals(SudokuSize::NINE),
        PuzzleOptions::default(),
        rng,
    )
}

/// Returns a copy of `solution` with up to `removals` filled cells cleared.
///
/// Cells are sampled uniformly without replacement from the filled cells. With
/// [`PuzzleOptions::require_unique`], a sampled cell is only cleared if the
/// result still has a single completion.
pub fn punch_holes<R>(
    solution: &SudokuGrid,
    removals: usize,
    options: PuzzleOptions,
    rng: &mut R,
) -> SudokuGrid
where
    R: Rng + ?Sized,
{
    let mut puzzle = solution.clone();
    let mut candidates: Vec<Position> = solution.filled_positions().collect();
    candidates.shuffle(rng);

    let mut removed = 0;
    for pos in candidates {
        if removed == removals {
            break;
        }
        let value = puzzle.get(pos);
        puzzle.clear(pos);
        if options.require_unique && count_solutions(&puzzle, 2) != 1 {
            puzzle.set(pos, value);
            continue;
        }
        removed += 1;
    }

    if removed < removals {
        log::debug!(
            "removed {removed} of {removals} requested cells from {} grid",
            solution.size()
        );
    }
    puzzle
}
