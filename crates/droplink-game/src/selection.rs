//! The chain of blocks a player is selecting.

use droplink_core::Position;
use droplink_generator::BlockBoard;

/// What a tap did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TapOutcome {
    /// The tapped block was appended to the chain.
    Extended,
    /// The chain was replaced by the tapped block alone.
    Restarted,
    /// The tapped cell holds no block; the chain was dropped.
    Cleared,
}

/// A chain of same-colored blocks, each adjacent to the previous one.
///
/// # Examples
///
/// ```
/// use droplink_core::{Grid, Position};
/// use droplink_game::{Selection, TapOutcome};
/// use droplink_generator::BlockBoard;
///
/// let cells = Grid::from_fn(3, 3, |pos| if pos.row() == pos.col() { 1 } else { 2 });
/// let board = BlockBoard::from_cells(cells, 2);
/// let mut selection = Selection::default();
///
/// assert_eq!(selection.tap(&board, Position::new(0, 0)), TapOutcome::Restarted);
/// assert_eq!(selection.tap(&board, Position::new(1, 1)), TapOutcome::Extended);
/// assert_eq!(selection.tap(&board, Position::new(0, 1)), TapOutcome::Restarted);
/// assert_eq!(selection.len(), 1);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    cells: Vec<Position>,
}

impl Selection {
    /// Returns the selected cells in tap order.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Returns the number of selected cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the most recently selected cell.
    #[must_use]
    pub fn tail(&self) -> Option<Position> {
        self.cells.last().copied()
    }

    /// Returns `true` if `pos` is part of the chain.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Drops the whole chain.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Applies a tap at `pos`.
    ///
    /// The tap extends the chain if `pos` holds a block of the chain's color,
    /// is 8-directionally adjacent to the tail, and is not selected yet.
    /// Otherwise a block starts a new chain and anything else drops the chain.
    pub fn tap(&mut self, board: &BlockBoard, pos: Position) -> TapOutcome {
        if !board.is_block(pos) {
            self.clear();
            return TapOutcome::Cleared;
        }
        let extends = self.tail().is_some_and(|tail| {
            tail.is_adjacent(pos) && board.get(tail) == board.get(pos) && !self.contains(pos)
        });
        if extends {
            self.cells.push(pos);
            TapOutcome::Extended
        } else {
            self.cells.clear();
            self.cells.push(pos);
            TapOutcome::Restarted
        }
    }

    pub(crate) fn take(&mut self) -> Vec<Position> {
        std::mem::take(&mut self.cells)
    }
}

#[cfg(test)]
mod tests {
    use droplink_core::Grid;
    use proptest::prelude::*;

    use super::*;

    fn board() -> BlockBoard {
        // 1 1 2
        // 2 1 0
        // 2 2 1
        let rows = [[1, 1, 2], [2, 1, 0], [2, 2, 1]];
        BlockBoard::from_cells(Grid::from_fn(3, 3, |p| rows[p.row()][p.col()]), 2)
    }

    #[test]
    fn test_extend_along_diagonal() {
        let board = board();
        let mut selection = Selection::default();
        selection.tap(&board, Position::new(0, 0));
        assert!(selection.tap(&board, Position::new(1, 1)).is_extended());
        assert!(selection.tap(&board, Position::new(2, 2)).is_extended());
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.tail(), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_non_adjacent_restarts() {
        let board = board();
        let mut selection = Selection::default();
        selection.tap(&board, Position::new(0, 0));
        assert!(selection.tap(&board, Position::new(2, 2)).is_restarted());
        assert_eq!(selection.cells(), &[Position::new(2, 2)]);
    }

    #[test]
    fn test_other_color_restarts() {
        let board = board();
        let mut selection = Selection::default();
        selection.tap(&board, Position::new(0, 1));
        assert!(selection.tap(&board, Position::new(0, 2)).is_restarted());
    }

    #[test]
    fn test_reselecting_chain_cell_restarts() {
        let board = board();
        let mut selection = Selection::default();
        selection.tap(&board, Position::new(0, 0));
        selection.tap(&board, Position::new(0, 1));
        assert!(selection.tap(&board, Position::new(0, 0)).is_restarted());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_empty_cell_clears() {
        let board = board();
        let mut selection = Selection::default();
        selection.tap(&board, Position::new(0, 0));
        assert!(selection.tap(&board, Position::new(1, 2)).is_cleared());
        assert!(selection.is_empty());
        assert!(selection.tap(&board, Position::new(7, 7)).is_cleared());
    }

    proptest! {
        #[test]
        fn test_selection_is_always_a_chain(
            values in prop::collection::vec(0_i8..=3, 16),
            taps in prop::collection::vec((0_usize..4, 0_usize..4), 0..40),
        ) {
            let board = BlockBoard::from_cells(Grid::from_fn(4, 4, |p| values[p.row() * 4 + p.col()]), 3);
            let mut selection = Selection::default();
            for (row, col) in taps {
                selection.tap(&board, Position::new(row, col));
                let cells = selection.cells();
                prop_assert!(cells.iter().all(|&pos| board.is_block(pos)));
                for pair in cells.windows(2) {
                    prop_assert!(pair[0].is_adjacent(pair[1]));
                    prop_assert_eq!(board.get(pair[0]), board.get(pair[1]));
                }
                for (i, pos) in cells.iter().enumerate() {
                    prop_assert!(!cells[i + 1..].contains(pos));
                }
            }
        }
    }
}
