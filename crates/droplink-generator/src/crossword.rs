//! Crossword grid generator.
//!
//! Words are drawn from the tiered [word bank](crate::WORD_BANK) and laid out
//! alternately across and down. A placement is only accepted if every cell it
//! covers is empty or already holds the same letter, so crossing words always
//! agree. A word that finds no such placement within a fixed number of random
//! attempts is left out.

use droplink_core::{Grid, Position};
use rand::{Rng, RngExt as _, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{LevelConfig, available_words};

const PLACEMENT_ATTEMPTS: usize = 50;

/// Orientation of a placed word.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right along a row.
    #[display("across")]
    Across,
    /// Top to bottom along a column.
    #[display("down")]
    Down,
}

impl Direction {
    /// Direction used for the `index`-th word: even indices go across, odd go down.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Across } else { Self::Down }
    }

    const fn step(self) -> (usize, usize) {
        match self {
            Self::Across => (0, 1),
            Self::Down => (1, 0),
        }
    }
}

/// Returns the `len` positions a word starting at `start` covers.
pub fn word_cells(
    start: Position,
    direction: Direction,
    len: usize,
) -> impl Iterator<Item = Position> {
    let (dr, dc) = direction.step();
    (0..len).map(move |i| Position::new(start.row() + dr * i, start.col() + dc * i))
}

/// A placed word with its clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueEntry {
    /// Clue number, counting placed words from 1.
    pub number: usize,
    /// Text shown to the player.
    pub clue: String,
    /// The word the player has to find.
    pub answer: String,
    /// Cell of the first letter.
    pub start: Position,
    /// Orientation of the answer.
    pub direction: Direction,
}

impl ClueEntry {
    /// Returns the positions covered by the answer.
    pub fn cells(&self) -> impl Iterator<Item = Position> + use<> {
        word_cells(self.start, self.direction, self.answer.len())
    }
}

/// A generated crossword: a letter grid and its clues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswordData {
    /// Letters of the solution; `None` marks a blocked cell.
    pub grid: Grid<Option<char>>,
    /// Clues for words read left to right, in number order.
    pub across: Vec<ClueEntry>,
    /// Clues for words read top to bottom, in number order.
    pub down: Vec<ClueEntry>,
}

impl CrosswordData {
    /// Returns the side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.rows()
    }

    /// Returns every clue in number order.
    #[must_use]
    pub fn entries(&self) -> Vec<&ClueEntry> {
        let mut entries: Vec<&ClueEntry> = self.across.iter().chain(&self.down).collect();
        entries.sort_by_key(|entry| entry.number);
        entries
    }

    /// Returns the number of placed words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.across.len() + self.down.len()
    }
}

/// Number of words requested for a complexity tier, before bank and grid limits.
#[must_use]
pub fn requested_word_count(complexity: u8) -> usize {
    5 + usize::from(complexity)
}

/// Generates a crossword for `config`.
///
/// Picks `min(5 + complexity, available)` shuffled words that fit in the grid and
/// places each at a random conflict-free position.
///
/// # Examples
///
/// ```
/// use droplink_generator::{generate_crossword, generate_level_config};
///
/// let config = generate_level_config("crossword", 0);
/// let crossword = generate_crossword(&config, &mut rand::rng());
///
/// assert_eq!(crossword.size(), 8);
/// assert!(crossword.word_count() >= 1);
/// for entry in crossword.entries() {
///     assert_eq!(entry.clue, format!("Clue for {}", entry.answer));
/// }
/// ```
pub fn generate_crossword<R>(config: &LevelConfig, rng: &mut R) -> CrosswordData
where
    R: Rng + ?Sized,
{
    let size = config.grid_size;
    let mut words: Vec<&str> = available_words(config.complexity, size).collect();
    words.shuffle(rng);
    words.truncate(requested_word_count(config.complexity));

    let mut crossword = CrosswordData {
        grid: Grid::square(size, None),
        across: Vec::new(),
        down: Vec::new(),
    };

    for (index, word) in words.into_iter().enumerate() {
        let direction = Direction::for_index(index);
        let Some(start) = find_placement(&crossword.grid, word, direction, rng) else {
            log::debug!("no {direction} placement for {word:?} in {size}x{size} grid");
            continue;
        };
        for (pos, letter) in word_cells(start, direction, word.len()).zip(word.chars()) {
            crossword.grid[pos] = Some(letter);
        }

        let entry = ClueEntry {
            number: crossword.word_count() + 1,
            clue: format!("Clue for {word}"),
            answer: word.to_owned(),
            start,
            direction,
        };
        match direction {
            Direction::Across => crossword.across.push(entry),
            Direction::Down => crossword.down.push(entry),
        }
    }

    log::debug!(
        "generated {size}x{size} crossword with {} words for level {}",
        crossword.word_count(),
        config.level
    );
    crossword
}

fn find_placement<R>(
    grid: &Grid<Option<char>>,
    word: &str,
    direction: Direction,
    rng: &mut R,
) -> Option<Position>
where
    R: Rng + ?Sized,
{
    let size = grid.rows();
    let len = word.len();
    if len == 0 || len > size {
        return None;
    }
    (0..PLACEMENT_ATTEMPTS).find_map(|_| {
        let (row, col) = match direction {
            Direction::Across => (rng.random_range(0..size), rng.random_range(0..=size - len)),
            Direction::Down => (rng.random_range(0..=size - len), rng.random_range(0..size)),
        };
        let start = Position::new(row, col);
        fits(grid, word, start, direction).then_some(start)
    })
}

fn fits(grid: &Grid<Option<char>>, word: &str, start: Position, direction: Direction) -> bool {
    word_cells(start, direction, word.len())
        .zip(word.chars())
        .all(|(pos, letter)| {
            grid.get(pos)
                .is_some_and(|cell| cell.is_none_or(|existing| existing == letter))
        })
}

#[cfg(test)]
mod tests {
    use droplink_core::PuzzleSeed;
    use proptest::prelude::*;

    use super::*;
    use crate::generate_level_config;

    fn assert_consistent(crossword: &CrosswordData) {
        let mut covered = Grid::square(crossword.size(), false);
        for entry in crossword.entries() {
            for (pos, letter) in entry.cells().zip(entry.answer.chars()) {
                assert_eq!(crossword.grid[pos], Some(letter), "{} at {pos}", entry.answer);
                covered[pos] = true;
            }
        }
        for (pos, cell) in crossword.grid.iter() {
            assert_eq!(cell.is_some(), covered[pos], "{pos}");
        }
    }

    #[test]
    fn test_basic_words_at_low_complexity() {
        let config = generate_level_config("crossword", 0);
        let crossword = generate_crossword(&config, &mut rand::rng());
        assert!(crossword.word_count() <= 6);
        assert!(crossword.entries().iter().all(|entry| entry.answer.len() == 3));
        assert_consistent(&crossword);
    }

    #[test]
    fn test_numbers_follow_placement_order() {
        let config = generate_level_config("crossword", 400);
        let mut rng = PuzzleSeed::from_bytes([7; 32]).rng();
        let crossword = generate_crossword(&config, &mut rng);
        let numbers: Vec<usize> = crossword.entries().iter().map(|e| e.number).collect();
        let expected: Vec<usize> = (1..=crossword.word_count()).collect();
        assert_eq!(numbers, expected);
        assert!(crossword.across.iter().all(|e| e.direction.is_across()));
        assert!(crossword.down.iter().all(|e| e.direction.is_down()));
    }

    #[test]
    fn test_conflicting_placement_rejected() {
        let mut grid = Grid::square(3, None);
        let cat = word_cells(Position::new(0, 0), Direction::Across, 3);
        for (pos, letter) in cat.zip("CAT".chars()) {
            grid[pos] = Some(letter);
        }
        assert!(fits(&grid, "CUP", Position::new(0, 0), Direction::Down));
        assert!(!fits(&grid, "DOG", Position::new(0, 0), Direction::Down));
        assert!(fits(&grid, "KEY", Position::new(1, 0), Direction::Across));
        assert!(!fits(&grid, "KEY", Position::new(0, 1), Direction::Across));
    }

    #[test]
    fn test_word_longer_than_grid_is_never_placed() {
        let grid = Grid::square(4, None);
        let mut rng = PuzzleSeed::from_bytes([1; 32]).rng();
        assert_eq!(find_placement(&grid, "HARMONY", Direction::Down, &mut rng), None);
        assert!(find_placement(&grid, "MAP", Direction::Down, &mut rng).is_some());
    }

    #[test]
    fn test_direction_alternates() {
        assert_eq!(Direction::for_index(0), Direction::Across);
        assert_eq!(Direction::for_index(1), Direction::Down);
        assert_eq!(Direction::for_index(4), Direction::Across);
        assert_eq!(Direction::Down.to_string(), "down");
    }

    proptest! {
        #[test]
        fn test_crossing_letters_agree(bytes in any::<[u8; 32]>(), level in 0_u64..1_000) {
            let config = generate_level_config("crossword", level);
            let mut rng = PuzzleSeed::from_bytes(bytes).rng();
            let crossword = generate_crossword(&config, &mut rng);
            prop_assert!(crossword.word_count() >= 1);
            prop_assert!(crossword.word_count() <= requested_word_count(config.complexity));
            assert_consistent(&crossword);
        }
    }
}
