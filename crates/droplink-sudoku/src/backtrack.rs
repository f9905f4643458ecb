//! Backtracking search over the unfilled cells of a grid.
//!
//! The search keeps an explicit stack of frames, one per unfilled cell, instead
//! of recursing. Each frame owns the order in which candidate symbols are tried
//! and a cursor into that order, so memory is bounded by the number of empty
//! cells and the search can stop at any solution.

use std::ops::ControlFlow;

use droplink_core::Position;
use rand::{Rng, seq::SliceRandom as _};

use crate::{SudokuGrid, SudokuSize, is_valid_move};

#[derive(Debug)]
struct Frame {
    depth: usize,
    order: Vec<u8>,
    next: usize,
}

/// Runs a depth-first search over the empty cells of `grid` in row-major order.
///
/// `order` supplies the candidate order for each newly entered cell. `on_solution`
/// is called with the grid every time all empty cells are filled; returning
/// [`ControlFlow::Break`] stops the search and leaves that solution in `grid`.
/// If the search runs to exhaustion, `grid` is restored to its initial state.
///
/// Returns `true` if the search was stopped by `on_solution`.
fn search<O, S>(grid: &mut SudokuGrid, mut order: O, mut on_solution: S) -> bool
where
    O: FnMut() -> Vec<u8>,
    S: FnMut(&SudokuGrid) -> ControlFlow<()>,
{
    let empties: Vec<Position> = grid.empty_positions().collect();
    if empties.is_empty() {
        return on_solution(grid).is_break();
    }

    let mut stack = vec![Frame {
        depth: 0,
        order: order(),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let pos = empties[frame.depth];
        grid.clear(pos);

        let mut placed = false;
        while let Some(&num) = frame.order.get(frame.next) {
            frame.next += 1;
            if is_valid_move(grid, pos, num) {
                grid.set(pos, num);
                placed = true;
                break;
            }
        }

        if !placed {
            stack.pop();
            continue;
        }

        let depth = frame.depth + 1;
        if depth == empties.len() {
            if on_solution(grid).is_break() {
                return true;
            }
            continue;
        }
        stack.push(Frame {
            depth,
            order: order(),
            next: 0,
        });
    }
    false
}

/// Generates a fully filled grid satisfying every row, column, and box constraint.
///
/// Candidate symbols are shuffled independently for every cell, so repeated
/// calls produce different grids.
///
/// # Examples
///
/// ```
/// use droplink_sudoku::{SudokuSize, check_sudoku_complete, generate_complete_sudoku};
///
/// let grid = generate_complete_sudoku(SudokuSize::NINE, &mut rand::rng());
/// assert!(check_sudoku_complete(&grid));
/// ```
pub fn generate_complete_sudoku<R>(size: SudokuSize, rng: &mut R) -> SudokuGrid
where
    R: Rng + ?Sized,
{
    let mut grid = SudokuGrid::new(size);
    let found = fill_randomized(&mut grid, rng);
    // An empty grid of a valid size always has a solution.
    assert!(found, "no completion exists for an empty {size} grid");
    log::debug!("generated complete {size} grid");
    grid
}

/// Fills the empty cells of `grid` with a random completion.
///
/// Returns `false`, leaving `grid` unchanged, if the given cells admit no completion.
pub fn fill_randomized<R>(grid: &mut SudokuGrid, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let symbols: Vec<u8> = grid.size().symbols().collect();
    search(
        grid,
        || {
            let mut order = symbols.clone();
            order.shuffle(rng);
            order
        },
        |_| ControlFlow::Break(()),
    )
}

/// Counts the completions of `grid`, stopping once `limit` have been found.
///
/// A return value equal to `limit` means "at least `limit`". Use a limit of 2
/// to test whether a puzzle has a unique solution. The grid is left unchanged.
///
/// # Examples
///
/// ```
/// use droplink_sudoku::{SudokuGrid, count_solutions};
///
/// let unique: SudokuGrid = "1234 3412 2143 432.".parse().unwrap();
/// assert_eq!(count_solutions(&unique, 2), 1);
///
/// let open: SudokuGrid = "12.. 34.. .... ....".parse().unwrap();
/// assert_eq!(count_solutions(&open, 2), 2);
/// ```
#[must_use]
pub fn count_solutions(grid: &SudokuGrid, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    let mut work = grid.clone();
    let symbols: Vec<u8> = grid.size().symbols().collect();
    let mut count = 0;
    search(
        &mut work,
        || symbols.clone(),
        |_| {
            count += 1;
            if count >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    );
    count
}
