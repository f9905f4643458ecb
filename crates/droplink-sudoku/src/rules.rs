//! Row, column, and box constraint checks.

use droplink_core::Position;

use crate::SudokuGrid;

/// Returns `true` if placing `num` at `pos` breaks no row, column, or box constraint.
///
/// The cell at `pos` itself is ignored, so a filled cell can be re-checked in
/// place. `num == 0` clears a cell and is always valid.
///
/// # Panics
///
/// Panics if `pos` is outside the grid.
///
/// # Examples
///
/// ```
/// use droplink_core::Position;
/// use droplink_sudoku::{SudokuGrid, is_valid_move};
///
/// let grid: SudokuGrid = "1... .... .... ....".parse().unwrap();
///
/// assert!(!is_valid_move(&grid, Position::new(0, 3), 1)); // same row
/// assert!(!is_valid_move(&grid, Position::new(3, 0), 1)); // same column
/// assert!(!is_valid_move(&grid, Position::new(1, 1), 1)); // same box
/// assert!(is_valid_move(&grid, Position::new(2, 2), 1));
/// assert!(is_valid_move(&grid, Position::new(0, 1), 0));
/// ```
#[must_use]
pub fn is_valid_move(grid: &SudokuGrid, pos: Position, num: u8) -> bool {
    assert!(grid.contains(pos), "position {pos} out of bounds");
    if num == 0 {
        return true;
    }
    peers(grid, pos).all(|peer| grid.get(peer) != num)
}

/// Returns `true` if every cell is filled and no filled cell conflicts with another.
///
/// # Examples
///
/// ```
/// use droplink_sudoku::{SudokuGrid, check_sudoku_complete};
///
/// let solved: SudokuGrid = "1234 3412 2143 4321".parse().unwrap();
/// assert!(check_sudoku_complete(&solved));
///
/// let conflicting: SudokuGrid = "1234 3412 2143 4312".parse().unwrap();
/// assert!(!check_sudoku_complete(&conflicting));
///
/// let unfinished: SudokuGrid = "1234 3412 2143 432.".parse().unwrap();
/// assert!(!check_sudoku_complete(&unfinished));
/// ```
#[must_use]
pub fn check_sudoku_complete(grid: &SudokuGrid) -> bool {
    grid.iter()
        .all(|(pos, value)| value != 0 && is_valid_move(grid, pos, value))
}

/// Returns the positions sharing a row, column, or box with `pos`, excluding `pos`.
///
/// Cells in both the box and the row or column appear more than once.
fn peers(grid: &SudokuGrid, pos: Position) -> impl Iterator<Item = Position> + use<> {
    let side = grid.side();
    let box_side = grid.size().box_side();
    let (row, col) = (pos.row(), pos.col());
    let box_row = row - row % box_side;
    let box_col = col - col % box_side;

    let row_cells = (0..side).map(move |c| Position::new(row, c));
    let col_cells = (0..side).map(move |r| Position::new(r, col));
    let box_cells = (0..box_side * box_side)
        .map(move |i| Position::new(box_row + i / box_side, box_col + i % box_side));

    row_cells
        .chain(col_cells)
        .chain(box_cells)
        .filter(move |&peer| peer != pos)
}
