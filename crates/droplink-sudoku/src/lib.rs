//! Constraint grid solver for Sudoku-style puzzles.
//!
//! This crate builds complete Sudoku grids with a randomized backtracking search
//! and turns them into puzzles by removing cells.
//!
//! # Overview
//!
//! - [`SudokuSize`]: Validated board dimensions (4×4, 9×9, 16×16).
//! - [`SudokuGrid`]: Cell values `0..=side`, `0` meaning unfilled.
//! - [`is_valid_move`] / [`check_sudoku_complete`]: Row, column, and box checks.
//! - [`generate_complete_sudoku`]: Random full solution via explicit-stack backtracking.
//! - [`count_solutions`]: Bounded solution counting, used for uniqueness checks.
//! - [`generate_sudoku_puzzle`] / [`SudokuPuzzle`]: Puzzles cut from a solution.
//!
//! Puzzles are not required to have a unique solution unless
//! [`PuzzleOptions::require_unique`] is set.
//!
//! # Examples
//!
//! ```
//! use droplink_core::PuzzleSeed;
//! use droplink_sudoku::{SudokuDifficulty, check_sudoku_complete, generate_sudoku_puzzle};
//!
//! let mut rng = PuzzleSeed::random().rng();
//! let generated = generate_sudoku_puzzle(SudokuDifficulty::Medium, &mut rng);
//!
//! assert!(check_sudoku_complete(&generated.solution));
//! assert_eq!(generated.puzzle.empty_count(), 45);
//! ```

pub use self::{backtrack::*, grid::*, puzzle::*, rules::*, size::*};

mod backtrack;
mod grid;
mod puzzle;
mod rules;
mod size;
