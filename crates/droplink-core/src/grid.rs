//! Rectangular cell matrix.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Position;

/// A rectangular matrix of cell values stored in row-major order.
///
/// `Grid` is the common board representation handed from generators to
/// game controllers and rendering collaborators. Indexing with a
/// [`Position`] outside the grid panics; use [`Grid::get`] for checked access.
///
/// # Examples
///
/// ```
/// use droplink_core::{Grid, Position};
///
/// let mut grid = Grid::new(2, 3, 0_i8);
/// grid[Position::new(1, 2)] = 7;
///
/// assert_eq!(grid.row(1), &[0, 0, 7]);
/// assert_eq!(grid.get(Position::new(2, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid filled with clones of `value`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Creates a square `size × size` grid filled with clones of `value`.
    #[must_use]
    pub fn square(size: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(size, size, value)
    }

    /// Creates a grid by calling `f` for every position in row-major order.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(Position) -> T,
    {
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Position::new(row, col)))
            .map(&mut f)
            .collect();
        Self { rows, cols, cells }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row() < self.rows && pos.col() < self.cols
    }

    /// Returns a reference to the cell at `pos`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.contains(pos)
            .then(|| &self.cells[pos.row() * self.cols + pos.col()])
    }

    /// Returns a mutable reference to the cell at `pos`, or `None` if out of bounds.
    #[must_use]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        if self.contains(pos) {
            Some(&mut self.cells[pos.row() * self.cols + pos.col()])
        } else {
            None
        }
    }

    /// Returns the cells of row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns an iterator over the rows of the grid.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // `max(1)` keeps `chunks` happy for zero-width grids.
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Returns an iterator over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    /// Returns an iterator over `(position, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.positions().zip(&self.cells)
    }

    /// Returns an iterator over cell values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Returns the in-bounds 8-directional neighbours of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + use<T> {
        pos.neighbors(self.rows, self.cols)
    }

    /// Returns a new grid with `f` applied to every cell.
    #[must_use]
    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(&mut f).collect(),
        }
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &Self::Output {
        assert!(self.contains(pos), "position {pos} out of bounds");
        &self.cells[pos.row() * self.cols + pos.col()]
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        assert!(self.contains(pos), "position {pos} out of bounds");
        &mut self.cells[pos.row() * self.cols + pos.col()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(2, 3, |pos| pos.row() * 10 + pos.col());
        assert_eq!(grid.row(0), &[0, 1, 2]);
        assert_eq!(grid.row(1), &[10, 11, 12]);
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn test_checked_access() {
        let mut grid = Grid::square(3, 'a');
        assert_eq!(grid.get(Position::new(2, 2)), Some(&'a'));
        assert_eq!(grid.get(Position::new(3, 0)), None);
        assert!(grid.get_mut(Position::new(0, 3)).is_none());

        *grid.get_mut(Position::new(1, 1)).unwrap() = 'z';
        assert_eq!(grid[Position::new(1, 1)], 'z');
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_out_of_bounds_panics() {
        let grid = Grid::square(2, 0_u8);
        let _ = grid[Position::new(0, 2)];
    }

    #[test]
    fn test_iteration_orders_agree() {
        let grid = Grid::from_fn(3, 2, |pos| (pos.row(), pos.col()));
        for (pos, value) in grid.iter() {
            assert_eq!(*value, (pos.row(), pos.col()));
        }
        let rows: Vec<_> = grid.iter_rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], &[(2, 0), (2, 1)]);
    }

    #[test]
    fn test_map() {
        let grid = Grid::from_fn(2, 2, |pos| pos.row() + pos.col());
        let doubled = grid.map(|v| v * 2);
        assert_eq!(doubled.row(1), &[2, 4]);
    }
}
