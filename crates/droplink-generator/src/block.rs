//! Block grid generator for matching games.

use droplink_core::{Grid, Position};
use rand::{Rng, RngExt as _};
use serde::{Deserialize, Serialize};

use crate::LevelConfig;

/// A square board of colored blocks.
///
/// Cell values are `1..=colors` for blocks, [`BlockBoard::EMPTY`] for cleared
/// cells, and [`BlockBoard::MARKED`] for cells tagged for clearing but not yet
/// removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBoard {
    cells: Grid<i8>,
    colors: u8,
}

impl BlockBoard {
    /// Value of a cleared cell.
    pub const EMPTY: i8 = 0;
    /// Value of a cell tagged for clearing.
    pub const MARKED: i8 = -1;

    /// Creates a board from raw cells.
    ///
    /// `colors` is the number of distinct block colors the board may contain.
    #[must_use]
    pub fn from_cells(cells: Grid<i8>, colors: u8) -> Self {
        Self { cells, colors }
    }

    /// Returns the cells of the board.
    #[must_use]
    pub fn cells(&self) -> &Grid<i8> {
        &self.cells
    }

    /// Returns the side length of the board.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.rows()
    }

    /// Returns the number of distinct block colors.
    #[must_use]
    pub fn colors(&self) -> u8 {
        self.colors
    }

    /// Returns the value at `pos`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<i8> {
        self.cells.get(pos).copied()
    }

    /// Returns `true` if `pos` holds a block (neither empty nor marked).
    #[must_use]
    pub fn is_block(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|value| value > 0)
    }

    /// Tags the block at `pos` for clearing. Returns `false` if there is no block.
    pub fn mark(&mut self, pos: Position) -> bool {
        match self.cells.get_mut(pos) {
            Some(value) if *value > 0 => {
                *value = Self::MARKED;
                true
            }
            _ => false,
        }
    }

    /// Clears every marked cell and returns how many were cleared.
    pub fn sweep_marked(&mut self) -> usize {
        let marked: Vec<Position> = self
            .cells
            .iter()
            .filter_map(|(pos, &value)| (value == Self::MARKED).then_some(pos))
            .collect();
        for &pos in &marked {
            self.cells[pos] = Self::EMPTY;
        }
        marked.len()
    }

    /// Returns the number of cells still holding a block.
    #[must_use]
    pub fn remaining_blocks(&self) -> usize {
        self.cells.values().filter(|&&value| value > 0).count()
    }

    /// Returns `true` if no blocks remain.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.remaining_blocks() == 0
    }

    /// Returns `true` if some chain of `min_chain` same-colored blocks exists in
    /// which each block is 8-directionally adjacent to the previous one.
    ///
    /// # Examples
    ///
    /// ```
    /// use droplink_core::Grid;
    /// use droplink_generator::BlockBoard;
    ///
    /// let mut cells = Grid::square(3, 0_i8);
    /// let diagonal = [(0, 0), (1, 1), (2, 2)];
    /// for (row, col) in diagonal {
    ///     cells[droplink_core::Position::new(row, col)] = 4;
    /// }
    /// let board = BlockBoard::from_cells(cells, 4);
    /// assert!(board.has_available_move(3));
    /// assert!(!board.has_available_move(4));
    /// ```
    #[must_use]
    pub fn has_available_move(&self, min_chain: usize) -> bool {
        if min_chain == 0 {
            return true;
        }
        let mut path = Vec::with_capacity(min_chain);
        self.cells.positions().any(|start| {
            self.is_block(start) && {
                path.clear();
                path.push(start);
                self.extend_chain(&mut path, min_chain)
            }
        })
    }

    fn extend_chain(&self, path: &mut Vec<Position>, target: usize) -> bool {
        if path.len() >= target {
            return true;
        }
        let Some(&tail) = path.last() else {
            return false;
        };
        let color = self.cells[tail];
        for next in self.cells.neighbors(tail) {
            if self.cells[next] != color || path.contains(&next) {
                continue;
            }
            path.push(next);
            if self.extend_chain(path, target) {
                return true;
            }
            path.pop();
        }
        false
    }
}

/// Number of distinct colors for a complexity tier.
#[must_use]
pub fn color_count(complexity: u8) -> u8 {
    complexity.saturating_add(2)
}

/// Generates a block board for `config`.
///
/// Every cell gets a uniformly drawn color in `1..=2 + complexity`. Afterwards,
/// on every even row, runs of `min_chain` cells starting every `min_chain + 1`
/// columns are painted with the color of their first cell, so the board always
/// offers some immediately clearable chains. This does not guarantee that the
/// whole board can be cleared.
///
/// # Examples
///
/// ```
/// use droplink_generator::{generate_block_board, generate_level_config};
///
/// let config = generate_level_config("block-connect", 0);
/// let board = generate_block_board(&config, 3, &mut rand::rng());
///
/// assert_eq!(board.size(), config.grid_size);
/// assert!(board.has_available_move(3));
/// ```
pub fn generate_block_board<R>(config: &LevelConfig, min_chain: usize, rng: &mut R) -> BlockBoard
where
    R: Rng + ?Sized,
{
    let size = config.grid_size;
    let colors = color_count(config.complexity);
    let max_color = i8::try_from(colors).unwrap_or(i8::MAX);

    let mut cells = Grid::from_fn(size, size, |_| rng.random_range(1..=max_color));
    seed_matches(&mut cells, min_chain);

    log::debug!(
        "generated {size}x{size} block board with {colors} colors for level {}",
        config.level
    );
    BlockBoard { cells, colors }
}

fn seed_matches(cells: &mut Grid<i8>, run: usize) {
    if run < 2 {
        return;
    }
    for row in (0..cells.rows()).step_by(2) {
        let mut col = 0;
        while col + run <= cells.cols() {
            let color = cells[Position::new(row, col)];
            for offset in 1..run {
                cells[Position::new(row, col + offset)] = color;
            }
            col += run + 1;
        }
    }
}
