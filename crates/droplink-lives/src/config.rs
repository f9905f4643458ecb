//! Tunables of the lives model.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Limits and timing of the lives model.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use droplink_lives::LivesConfig;
///
/// let config = LivesConfig::default();
/// assert_eq!(config.max_lives, 5);
/// assert_eq!(config.regen_period(), TimeDelta::minutes(30));
///
/// let quick = LivesConfig::default().max_lives(3).regen_period_secs(60);
/// assert_eq!(quick.regen_period(), TimeDelta::minutes(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivesConfig {
    /// Upper bound of the life count, and the count of a fresh account.
    pub max_lives: u32,
    /// Seconds it takes to regenerate one life.
    pub regen_period_secs: u32,
    /// Number of recent reward keys remembered to reject replays.
    pub reward_history: usize,
}

impl Default for LivesConfig {
    fn default() -> Self {
        Self {
            max_lives: 5,
            regen_period_secs: 30 * 60,
            reward_history: 32,
        }
    }
}

impl LivesConfig {
    /// Sets [`LivesConfig::max_lives`].
    #[must_use]
    pub fn max_lives(mut self, max_lives: u32) -> Self {
        self.max_lives = max_lives;
        self
    }

    /// Sets [`LivesConfig::regen_period_secs`].
    #[must_use]
    pub fn regen_period_secs(mut self, secs: u32) -> Self {
        self.regen_period_secs = secs;
        self
    }

    /// Sets [`LivesConfig::reward_history`].
    #[must_use]
    pub fn reward_history(mut self, len: usize) -> Self {
        self.reward_history = len;
        self
    }

    /// Returns the regeneration period. A zero period counts as one second.
    #[must_use]
    pub fn regen_period(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.regen_period_secs.max(1)))
    }
}
