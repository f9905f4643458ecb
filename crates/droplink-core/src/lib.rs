//! Core data structures shared by the Droplink puzzle engines.
//!
//! This crate provides the small set of types every generator and game
//! controller builds on:
//!
//! - [`position`]: Row/column coordinates and 8-directional adjacency.
//! - [`grid`]: A rectangular, row-major matrix of cell values.
//! - [`seed`]: Reproducible random seeds for content generation.
//!
//! # Examples
//!
//! ```
//! use droplink_core::{Grid, Position, PuzzleSeed};
//! use rand::RngExt as _;
//!
//! let seed: PuzzleSeed = "00".repeat(32).parse().unwrap();
//! let mut rng = seed.rng();
//!
//! let grid = Grid::from_fn(3, 3, |_| rng.random_range(1..=4_i8));
//! assert_eq!(grid.rows(), 3);
//! assert!((1..=4).contains(&grid[Position::new(1, 1)]));
//! ```

pub mod grid;
pub mod position;
pub mod seed;

pub use self::{
    grid::Grid,
    position::Position,
    seed::{PuzzleSeed, SeedParseError},
};
