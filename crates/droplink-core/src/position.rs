//! Board position representation.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A cell coordinate on a rectangular board.
///
/// Rows grow downwards and columns grow to the right; `(0, 0)` is the top-left cell.
///
/// # Examples
///
/// ```
/// use droplink_core::Position;
///
/// let pos = Position::new(2, 3);
/// assert_eq!(pos.row(), 2);
/// assert_eq!(pos.col(), 3);
/// assert!(pos.is_adjacent(Position::new(3, 4)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Offsets of the eight neighbouring cells, in reading order.
    pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    /// Creates a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row index.
    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    /// Returns the column index.
    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Returns `true` if `other` is one of the eight cells surrounding `self`.
    ///
    /// A position is not adjacent to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use droplink_core::Position;
    ///
    /// let center = Position::new(1, 1);
    /// assert!(center.is_adjacent(Position::new(0, 0)));
    /// assert!(center.is_adjacent(Position::new(2, 1)));
    /// assert!(!center.is_adjacent(center));
    /// assert!(!center.is_adjacent(Position::new(3, 1)));
    /// ```
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && !(dr == 0 && dc == 0)
    }

    /// Returns the position shifted by `(dr, dc)`, or `None` if it would leave
    /// a `rows × cols` board.
    #[must_use]
    pub fn offset(self, dr: isize, dc: isize, rows: usize, cols: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some(Self { row, col })
    }

    /// Returns the in-bounds neighbours of this position on a `rows × cols` board.
    pub fn neighbors(self, rows: usize, cols: usize) -> impl Iterator<Item = Self> {
        Self::NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc, rows, cols))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_eight_directional() {
        let center = Position::new(5, 5);
        let adjacent = (3..8)
            .flat_map(|r| (3..8).map(move |c| Position::new(r, c)))
            .filter(|&p| center.is_adjacent(p))
            .count();
        assert_eq!(adjacent, 8);
    }

    #[test]
    fn test_neighbors_respect_bounds() {
        assert_eq!(Position::new(0, 0).neighbors(3, 3).count(), 3);
        assert_eq!(Position::new(0, 1).neighbors(3, 3).count(), 5);
        assert_eq!(Position::new(1, 1).neighbors(3, 3).count(), 8);
        assert_eq!(Position::new(2, 2).neighbors(3, 3).count(), 3);
        assert_eq!(Position::new(0, 0).neighbors(1, 1).count(), 0);
    }

    #[test]
    fn test_offset() {
        let pos = Position::new(0, 2);
        assert_eq!(pos.offset(-1, 0, 3, 3), None);
        assert_eq!(pos.offset(0, 1, 3, 3), None);
        assert_eq!(pos.offset(1, -1, 3, 3), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 7).to_string(), "(3, 7)");
    }
}
