//! Level-driven Sudoku generator.

use droplink_sudoku::{PuzzleOptions, SudokuPuzzle, SudokuSize};
use rand::Rng;

use crate::LevelConfig;

const BASE_SIDE: usize = 4;
const MAX_SIDE: usize = 9;
const LEVELS_PER_SIDE_STEP: u64 = 1000;

/// Returns the board size used at `level`.
///
/// The nominal side is `min(9, 4 + level / 1000)`, snapped down to the largest
/// perfect square, so boards stay 4×4 until level 5000 and are 9×9 from then on.
///
/// # Examples
///
/// ```
/// use droplink_generator::level_sudoku_size;
/// use droplink_sudoku::SudokuSize;
///
/// assert_eq!(level_sudoku_size(0), SudokuSize::FOUR);
/// assert_eq!(level_sudoku_size(4_999), SudokuSize::FOUR);
/// assert_eq!(level_sudoku_size(5_000), SudokuSize::NINE);
/// ```
#[must_use]
pub fn level_sudoku_size(level: u64) -> SudokuSize {
    let side = usize::try_from(level / LEVELS_PER_SIDE_STEP)
        .map_or(MAX_SIDE, |step| BASE_SIDE.saturating_add(step))
        .min(MAX_SIDE);
    SudokuSize::at_most(side)
}

/// Returns how many cells to remove from a board of `size` at `difficulty`.
///
/// Computes `floor(cells × (30 + 5 × difficulty) / 100)`, clamped to the cell count.
///
/// # Examples
///
/// ```
/// use droplink_generator::level_sudoku_removals;
/// use droplink_sudoku::SudokuSize;
///
/// assert_eq!(level_sudoku_removals(SudokuSize::FOUR, 1), 5);
/// assert_eq!(level_sudoku_removals(SudokuSize::NINE, 10), 64);
/// ```
#[must_use]
pub fn level_sudoku_removals(size: SudokuSize, difficulty: u8) -> usize {
    let percent = 30 + 5 * usize::from(difficulty);
    (size.cell_count() * percent / 100).min(size.cell_count())
}

/// Generates the Sudoku puzzle for `config`.
///
/// # Examples
///
/// ```
/// use droplink_generator::{generate_level_config, generate_level_sudoku};
/// use droplink_sudoku::{PuzzleOptions, check_sudoku_complete};
///
/// let config = generate_level_config("sudoku", 42);
/// let generated = generate_level_sudoku(&config, PuzzleOptions::default(), &mut rand::rng());
///
/// assert_eq!(generated.puzzle.side(), 4);
/// assert_eq!(generated.removed_count(), 8);
/// assert!(check_sudoku_complete(&generated.solution));
/// ```
pub fn generate_level_sudoku<R>(
    config: &LevelConfig,
    options: PuzzleOptions,
    rng: &mut R,
) -> SudokuPuzzle
where
    R: Rng + ?Sized,
{
    let size = level_sudoku_size(config.level);
    let removals = level_sudoku_removals(size, config.difficulty);
    log::debug!(
        "generating {size} sudoku with {removals} removals for level {}",
        config.level
    );
    SudokuPuzzle::generate(size, removals, options, rng)
}
