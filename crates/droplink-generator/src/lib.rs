//! Level configuration and content generation for Droplink games.
//!
//! # Overview
//!
//! - [`generate_level_config`]: Maps a game id and level number to a [`LevelConfig`].
//! - [`generate_block_board`]: Colored block grids with seeded matches.
//! - [`generate_crossword`]: Word grids with across and down clues.
//! - [`generate_level_sudoku`]: Sudoku puzzles whose size and removals follow the level.
//! - [`LevelGenerator`]: Picks the generator for a game and reproduces levels from seeds.
//!
//! All generators are pure functions of their configuration and random number
//! generator. None of them fails for a configuration produced by
//! [`generate_level_config`].
//!
//! # Examples
//!
//! ```
//! use droplink_core::PuzzleSeed;
//! use droplink_generator::{GeneratedContent, LevelGenerator};
//!
//! let generator = LevelGenerator::new(PuzzleSeed::random());
//! let level = generator.generate("block-connect", 250);
//!
//! assert_eq!(level.config.difficulty, 10);
//! assert_eq!(level.config.complexity, 6);
//! match &level.content {
//!     GeneratedContent::Block(board) => assert_eq!(board.size(), level.config.grid_size),
//!     _ => unreachable!(),
//! }
//! ```

pub use self::{block::*, crossword::*, generated::*, level::*, sudoku::*, words::*};

mod block;
mod crossword;
mod generated;
mod level;
mod sudoku;
mod words;
