//! Sudoku cell grid.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use droplink_core::{Grid, Position};
use serde::{Deserialize, Serialize};

use crate::{SudokuSize, SudokuSizeError};

/// Symbols used when displaying cells, indexed by cell value.
const SYMBOLS: &[u8; 26] = b".123456789ABCDEFGHIJKLMNOP";

/// A Sudoku board whose cells hold `0` (unfilled) or a symbol `1..=side`.
///
/// The grid enforces only the value range; row, column, and box constraints
/// are checked by [`is_valid_move`](crate::is_valid_move) and
/// [`check_sudoku_complete`](crate::check_sudoku_complete).
///
/// # String format
///
/// Grids display as one character per cell in row-major order, with `.` for
/// unfilled cells and `1`-`9` then `A`-`P` for symbols. Parsing also accepts
/// `0` and `_` for unfilled cells and ignores whitespace; the side is inferred
/// from the number of cells.
///
/// # Examples
///
/// ```
/// use droplink_core::Position;
/// use droplink_sudoku::{SudokuGrid, SudokuSize};
///
/// let grid: SudokuGrid = "
///     12 34
///     34 12
///     21 43
///     43 2.
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(grid.size(), SudokuSize::FOUR);
/// assert_eq!(grid.get(Position::new(3, 3)), 0);
/// assert_eq!(grid.filled_count(), 15);
/// assert_eq!(grid.to_string(), "123434122143432.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SudokuGrid {
    size: SudokuSize,
    cells: Grid<u8>,
}

impl SudokuGrid {
    /// Creates an empty grid of the given size.
    #[must_use]
    pub fn new(size: SudokuSize) -> Self {
        Self {
            size,
            cells: Grid::square(size.side(), 0),
        }
    }

    /// Returns the size of the grid.
    #[must_use]
    pub fn size(&self) -> SudokuSize {
        self.size
    }

    /// Returns the side length of the grid.
    #[must_use]
    pub fn side(&self) -> usize {
        self.size.side()
    }

    /// Returns the value at `pos` (`0` if unfilled).
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> u8 {
        self.cells[pos]
    }

    /// Sets the value at `pos`; `0` clears the cell.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid or `value` exceeds the side length.
    pub fn set(&mut self, pos: Position, value: u8) {
        assert!(
            usize::from(value) <= self.side(),
            "value {value} out of range for {} grid",
            self.size
        );
        self.cells[pos] = value;
    }

    /// Clears the cell at `pos`.
    pub fn clear(&mut self, pos: Position) {
        self.cells[pos] = 0;
    }

    /// Returns `true` if `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(pos)
    }

    /// Returns an iterator over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        self.cells.positions()
    }

    /// Returns an iterator over `(position, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, u8)> {
        self.cells.iter().map(|(pos, &value)| (pos, value))
    }

    /// Returns an iterator over the positions of unfilled cells.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> {
        self.iter()
            .filter_map(|(pos, value)| (value == 0).then_some(pos))
    }

    /// Returns an iterator over the positions of filled cells.
    pub fn filled_positions(&self) -> impl Iterator<Item = Position> {
        self.iter()
            .filter_map(|(pos, value)| (value != 0).then_some(pos))
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.values().filter(|&&value| value != 0).count()
    }

    /// Returns the number of unfilled cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.size.cell_count() - self.filled_count()
    }

    /// Returns `true` if no cell is unfilled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.values().all(|&value| value != 0)
    }

    /// Returns the cells as a generic grid, for hand-off to renderers.
    #[must_use]
    pub fn as_grid(&self) -> &Grid<u8> {
        &self.cells
    }
}

impl Display for SudokuGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &value in self.cells.values() {
            write!(f, "{}", char::from(SYMBOLS[usize::from(value)]))?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`SudokuGrid`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridParseError {
    /// The number of cells does not form a supported square board.
    #[display("invalid cell count {count}: {source}")]
    InvalidCellCount {
        /// Number of cells found.
        count: usize,
        /// Why the inferred side was rejected.
        source: SudokuSizeError,
    },
    /// A character is not a valid cell symbol.
    #[display("invalid cell symbol {ch:?}")]
    InvalidSymbol {
        /// The offending character.
        ch: char,
    },
    /// A symbol exceeds the side length of the inferred board.
    #[display("symbol {ch:?} out of range for {size} grid")]
    SymbolOutOfRange {
        /// The offending character.
        ch: char,
        /// The inferred board size.
        size: SudokuSize,
    },
}

fn parse_symbol(ch: char) -> Option<u8> {
    match ch {
        '.' | '_' | '0' => Some(0),
        _ => SYMBOLS[1..]
            .iter()
            .position(|&symbol| char::from(symbol) == ch.to_ascii_uppercase())
            .and_then(|index| u8::try_from(index + 1).ok()),
    }
}

impl FromStr for SudokuGrid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| parse_symbol(ch).map(|value| (ch, value)))
            .collect::<Option<Vec<_>>>();
        let Some(values) = values else {
            let ch = s
                .chars()
                .find(|&ch| !ch.is_whitespace() && parse_symbol(ch).is_none())
                .unwrap_or_default();
            return Err(GridParseError::InvalidSymbol { ch });
        };

        let count = values.len();
        let size = SudokuSize::new(count.isqrt())
            .and_then(|size| {
                if size.cell_count() == count {
                    Ok(size)
                } else {
                    Err(SudokuSizeError::NotSquare { side: count })
                }
            })
            .map_err(|source| GridParseError::InvalidCellCount { count, source })?;

        let mut grid = Self::new(size);
        for (pos, (ch, value)) in grid.positions().zip(values) {
            if usize::from(value) > size.side() {
                return Err(GridParseError::SymbolOutOfRange { ch, size });
            }
            grid.cells[pos] = value;
        }
        Ok(grid)
    }
}
