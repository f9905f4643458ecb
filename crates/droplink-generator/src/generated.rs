//! Dispatch from a game and level to generated content.

use droplink_core::PuzzleSeed;
use droplink_sudoku::{PuzzleOptions, SudokuPuzzle};
use serde::{Deserialize, Serialize};

use crate::{
    BlockBoard, CrosswordData, GameFamily, LevelConfig, generate_block_board, generate_crossword,
    generate_level_config, generate_level_sudoku,
};

/// Board content of a generated level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "family", content = "board", rename_all = "lowercase")]
pub enum GeneratedContent {
    /// A block-matching board.
    Block(BlockBoard),
    /// A crossword grid with clues.
    Crossword(CrosswordData),
    /// A Sudoku puzzle with its solution.
    Sudoku(SudokuPuzzle),
}

impl GeneratedContent {
    /// Returns the block board, if this is block content.
    #[must_use]
    pub fn as_block(&self) -> Option<&BlockBoard> {
        match self {
            Self::Block(board) => Some(board),
            _ => None,
        }
    }

    /// Returns the crossword, if this is crossword content.
    #[must_use]
    pub fn as_crossword(&self) -> Option<&CrosswordData> {
        match self {
            Self::Crossword(crossword) => Some(crossword),
            _ => None,
        }
    }

    /// Returns the Sudoku puzzle, if this is Sudoku content.
    #[must_use]
    pub fn as_sudoku(&self) -> Option<&SudokuPuzzle> {
        match self {
            Self::Sudoku(puzzle) => Some(puzzle),
            _ => None,
        }
    }
}

/// A level's configuration, the seed its content was generated from, and the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    /// Resolved parameters of the level.
    pub config: LevelConfig,
    /// Seed that reproduces `content` from `config`.
    pub seed: PuzzleSeed,
    /// The generated board.
    pub content: GeneratedContent,
}

/// Generates level content reproducibly from a base seed.
///
/// Every `(game_id, level)` pair gets its own seed derived from the base seed,
/// so generating the same level twice yields the same board, and levels can be
/// generated ahead of time in any order.
///
/// # Examples
///
/// ```
/// use droplink_core::PuzzleSeed;
/// use droplink_generator::LevelGenerator;
///
/// let generator = LevelGenerator::new(PuzzleSeed::from_bytes([0; 32]));
/// let first = generator.generate("color-match", 12);
/// let again = generator.generate("color-match", 12);
///
/// assert_eq!(first, again);
/// assert!(first.content.is_block());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGenerator {
    base_seed: PuzzleSeed,
    min_chain: usize,
    sudoku_options: PuzzleOptions,
}

impl LevelGenerator {
    /// Chain length block boards are seeded for unless overridden.
    pub const DEFAULT_MIN_CHAIN: usize = 3;

    /// Creates a generator deriving level seeds from `base_seed`.
    #[must_use]
    pub fn new(base_seed: PuzzleSeed) -> Self {
        Self {
            base_seed,
            min_chain: Self::DEFAULT_MIN_CHAIN,
            sudoku_options: PuzzleOptions::default(),
        }
    }

    /// Sets the chain length block boards are seeded for.
    #[must_use]
    pub fn min_chain(mut self, min_chain: usize) -> Self {
        self.min_chain = min_chain;
        self
    }

    /// Sets the options used for Sudoku cell removal.
    #[must_use]
    pub fn sudoku_options(mut self, options: PuzzleOptions) -> Self {
        self.sudoku_options = options;
        self
    }

    /// Returns the base seed.
    #[must_use]
    pub fn base_seed(&self) -> PuzzleSeed {
        self.base_seed
    }

    /// Returns the seed used for `level` of `game_id`.
    #[must_use]
    pub fn level_seed(&self, game_id: &str, level: u64) -> PuzzleSeed {
        self.base_seed.derive(game_id, level)
    }

    /// Resolves the configuration of `level` and generates its content.
    #[must_use]
    pub fn generate(&self, game_id: &str, level: u64) -> GeneratedLevel {
        let config = generate_level_config(game_id, level);
        let seed = self.level_seed(game_id, level);
        self.generate_with_seed(config, seed)
    }

    /// Generates content for an already resolved `config` from `seed`.
    #[must_use]
    pub fn generate_with_seed(&self, config: LevelConfig, seed: PuzzleSeed) -> GeneratedLevel {
        let mut rng = seed.rng();
        let content = match config.family {
            GameFamily::Block => {
                GeneratedContent::Block(generate_block_board(&config, self.min_chain, &mut rng))
            }
            GameFamily::Crossword => {
                GeneratedContent::Crossword(generate_crossword(&config, &mut rng))
            }
            GameFamily::Sudoku => GeneratedContent::Sudoku(generate_level_sudoku(
                &config,
                self.sudoku_options,
                &mut rng,
            )),
        };
        log::debug!(
            "generated level {} of {:?} from seed {seed}",
            config.level,
            config.game_id
        );
        GeneratedLevel {
            config,
            seed,
            content,
        }
    }
}
