//! Sudoku board dimensions.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Side length of a Sudoku board together with its box side.
///
/// Only perfect squares are valid sides: a side of `n²` is split into `n × n`
/// boxes of `n × n` cells each. Supported sides are 4, 9, and 16. Larger boards are
/// rejected because filling them by backtracking has no practical bound.
///
/// # Examples
///
/// ```
/// use droplink_sudoku::SudokuSize;
///
/// let size = SudokuSize::new(9).unwrap();
/// assert_eq!(size.box_side(), 3);
/// assert_eq!(size.cell_count(), 81);
///
/// assert!(SudokuSize::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct SudokuSize {
    box_side: u8,
}

/// Error returned when a side length cannot form a Sudoku board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SudokuSizeError {
    /// The side is not the square of an integer.
    #[display("sudoku side {side} is not a perfect square")]
    NotSquare {
        /// The rejected side length.
        side: usize,
    },
    /// The side is a perfect square but outside the supported range.
    #[display("sudoku side {side} is outside the supported range 4..=16")]
    Unsupported {
        /// The rejected side length.
        side: usize,
    },
}

impl SudokuSize {
    /// The 4×4 board with 2×2 boxes.
    pub const FOUR: Self = Self { box_side: 2 };
    /// The classic 9×9 board with 3×3 boxes.
    pub const NINE: Self = Self { box_side: 3 };
    /// The 16×16 board with 4×4 boxes.
    pub const SIXTEEN: Self = Self { box_side: 4 };

    const MIN_BOX_SIDE: usize = 2;
    const MAX_BOX_SIDE: usize = 4;

    /// Creates a size from a side length.
    ///
    /// # Errors
    ///
    /// Returns [`SudokuSizeError::NotSquare`] if `side` is not a perfect square, and
    /// [`SudokuSizeError::Unsupported`] if it is outside `4..=16`.
    pub fn new(side: usize) -> Result<Self, SudokuSizeError> {
        let box_side = side.isqrt();
        if box_side * box_side != side {
            return Err(SudokuSizeError::NotSquare { side });
        }
        if !(Self::MIN_BOX_SIDE..=Self::MAX_BOX_SIDE).contains(&box_side) {
            return Err(SudokuSizeError::Unsupported { side });
        }
        #[expect(clippy::cast_possible_truncation)]
        let box_side = box_side as u8;
        Ok(Self { box_side })
    }

    /// Returns the largest supported size whose side does not exceed `side`.
    ///
    /// Sides below 4 snap up to 4 and sides above 16 snap down to 16.
    ///
    /// # Examples
    ///
    /// ```
    /// use droplink_sudoku::SudokuSize;
    ///
    /// assert_eq!(SudokuSize::at_most(7), SudokuSize::FOUR);
    /// assert_eq!(SudokuSize::at_most(9), SudokuSize::NINE);
    /// assert_eq!(SudokuSize::at_most(2), SudokuSize::FOUR);
    /// assert_eq!(SudokuSize::at_most(25), SudokuSize::SIXTEEN);
    /// ```
    #[must_use]
    pub fn at_most(side: usize) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let box_side = side
            .isqrt()
            .clamp(Self::MIN_BOX_SIDE, Self::MAX_BOX_SIDE) as u8;
        Self { box_side }
    }

    /// Returns the side length (number of rows, columns, and symbols).
    #[must_use]
    pub const fn side(self) -> usize {
        self.box_side as usize * self.box_side as usize
    }

    /// Returns the side length of one box.
    #[must_use]
    pub const fn box_side(self) -> usize {
        self.box_side as usize
    }

    /// Returns the total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.side() * self.side()
    }

    /// Returns the symbols `1..=side` in ascending order.
    pub fn symbols(self) -> impl Iterator<Item = u8> {
        #[expect(clippy::cast_possible_truncation)]
        let side = self.side() as u8;
        1..=side
    }
}

impl Display for SudokuSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

impl From<SudokuSize> for u8 {
    #[expect(clippy::cast_possible_truncation)]
    fn from(size: SudokuSize) -> Self {
        size.side() as u8
    }
}

impl TryFrom<u8> for SudokuSize {
    type Error = SudokuSizeError;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(side))
    }
}
