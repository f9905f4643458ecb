//! Scoring and selection rules of a session.

use serde::{Deserialize, Serialize};

/// Rules a [`BlockSession`](crate::BlockSession) plays by.
///
/// # Examples
///
/// ```
/// use droplink_game::SessionOptions;
///
/// let options = SessionOptions::default();
/// assert_eq!(options.min_chain, 3);
/// assert_eq!(options.clear_points(4), 40);
/// assert_eq!(options.level_bonus(25), 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Shortest chain that can be committed.
    pub min_chain: usize,
    /// Points per cleared cell.
    pub clear_points_per_cell: u64,
    /// Bonus per level number for clearing a whole board.
    pub level_bonus_per_level: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_chain: 3,
            clear_points_per_cell: 10,
            level_bonus_per_level: 10,
        }
    }
}

impl SessionOptions {
    /// Sets [`SessionOptions::min_chain`].
    #[must_use]
    pub fn min_chain(mut self, min_chain: usize) -> Self {
        self.min_chain = min_chain;
        self
    }

    /// Returns the points for clearing `cells` cells.
    #[must_use]
    pub fn clear_points(&self, cells: usize) -> u64 {
        u64::try_from(cells)
            .unwrap_or(u64::MAX)
            .saturating_mul(self.clear_points_per_cell)
    }

    /// Returns the bonus for completing `level`.
    #[must_use]
    pub fn level_bonus(&self, level: u64) -> u64 {
        level.saturating_mul(self.level_bonus_per_level)
    }
}
