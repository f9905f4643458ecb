//! Level configuration resolver.
//!
//! Maps a `(game_id, level)` pair to the parameters a content generator needs.
//! Every parameter is a monotonic step function of the level number, so the
//! same input always yields the same [`LevelConfig`].

use serde::{Deserialize, Serialize};

/// Content family a game draws its boards from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum GameFamily {
    /// Colored block grids cleared by chaining matching cells.
    #[display("block")]
    Block,
    /// Word grids with across and down clues.
    #[display("crossword")]
    Crossword,
    /// Number-place grids.
    #[display("sudoku")]
    Sudoku,
}

/// Static per-game bounds used by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameProfile {
    /// Identifier the profile is looked up by.
    pub game_id: &'static str,
    /// Content family used for this game.
    pub family: GameFamily,
    /// Grid size at level 0.
    pub min_grid_size: usize,
    /// Largest grid size reached at high levels.
    pub max_grid_size: usize,
    /// Whether levels carry a gameplay countdown.
    pub has_time_limit: bool,
}

impl GameProfile {
    /// Profile used for game ids without an entry in [`GameProfile::ALL`].
    pub const DEFAULT: Self = Self {
        game_id: "default",
        family: GameFamily::Block,
        min_grid_size: 5,
        max_grid_size: 10,
        has_time_limit: false,
    };

    /// Profiles of all known games.
    pub const ALL: &[Self] = &[
        Self {
            game_id: "block-connect",
            family: GameFamily::Block,
            min_grid_size: 6,
            max_grid_size: 10,
            has_time_limit: true,
        },
        Self {
            game_id: "color-match",
            family: GameFamily::Block,
            min_grid_size: 5,
            max_grid_size: 9,
            has_time_limit: true,
        },
        Self {
            game_id: "crossword",
            family: GameFamily::Crossword,
            min_grid_size: 8,
            max_grid_size: 15,
            has_time_limit: false,
        },
        Self {
            game_id: "sudoku",
            family: GameFamily::Sudoku,
            min_grid_size: 4,
            max_grid_size: 9,
            has_time_limit: false,
        },
    ];

    /// Looks up the profile registered for `game_id`.
    #[must_use]
    pub fn lookup(game_id: &str) -> Option<&'static Self> {
        Self::ALL.iter().find(|profile| profile.game_id == game_id)
    }

    /// Returns the profile for `game_id`, falling back to [`GameProfile::DEFAULT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use droplink_generator::{GameFamily, GameProfile};
    ///
    /// assert_eq!(GameProfile::resolve("sudoku").family, GameFamily::Sudoku);
    /// assert_eq!(GameProfile::resolve("no-such-game"), &GameProfile::DEFAULT);
    /// ```
    #[must_use]
    pub fn resolve(game_id: &str) -> &'static Self {
        match Self::lookup(game_id) {
            Some(profile) => profile,
            None => {
                log::debug!("unknown game id {game_id:?}, using default profile");
                &Self::DEFAULT
            }
        }
    }
}

/// Highest difficulty and complexity tier.
pub const MAX_TIER: u8 = 10;
/// Countdown in seconds at level 0 for timed games.
pub const BASE_TIME_LIMIT_SECS: u32 = 120;
/// Shortest countdown in seconds a timed level can have.
pub const MIN_TIME_LIMIT_SECS: u32 = 30;

const LEVELS_PER_DIFFICULTY: u64 = 10;
const LEVELS_PER_GRID_STEP: u64 = 100;
const LEVELS_PER_COMPLEXITY: u64 = 50;
const LEVELS_PER_SECOND: u64 = 20;

/// Generation parameters for one level of one game.
///
/// Produced by [`generate_level_config`]; immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Game the configuration was resolved for.
    pub game_id: String,
    /// Content family of the game.
    pub family: GameFamily,
    /// Level number, starting at 0.
    pub level: u64,
    /// Difficulty tier in `1..=10`, non-decreasing in `level`.
    pub difficulty: u8,
    /// Grid side length, bounded by the game profile and non-decreasing in `level`.
    pub grid_size: usize,
    /// Content density tier in `1..=10`, non-decreasing in `level`.
    pub complexity: u8,
    /// Gameplay countdown in seconds, present only for timed games.
    pub time_limit: Option<u32>,
}

/// Resolves the configuration of `level` for `game_id`.
///
/// - `difficulty = min(10, 1 + level / 10)`
/// - `grid_size = min(max_grid_size, min_grid_size + level / 100)`
/// - `complexity = min(10, 1 + level / 50)`
/// - `time_limit = max(30, 120 - level / 20)` seconds for timed games
///
/// Unknown game ids use [`GameProfile::DEFAULT`].
///
/// # Examples
///
/// ```
/// use droplink_generator::generate_level_config;
///
/// let config = generate_level_config("block-connect", 250);
/// assert_eq!(config.difficulty, 10);
/// assert_eq!(config.complexity, 6);
/// assert_eq!(config.grid_size, 8);
/// assert_eq!(config.time_limit, Some(108));
/// ```
#[must_use]
pub fn generate_level_config(game_id: &str, level: u64) -> LevelConfig {
    let profile = GameProfile::resolve(game_id);

    let grid_size = usize::try_from(level / LEVELS_PER_GRID_STEP)
        .map_or(profile.max_grid_size, |step| {
            profile.min_grid_size.saturating_add(step)
        })
        .min(profile.max_grid_size);

    let time_limit = profile.has_time_limit.then(|| {
        let decrease = u32::try_from(level / LEVELS_PER_SECOND).unwrap_or(u32::MAX);
        BASE_TIME_LIMIT_SECS
            .saturating_sub(decrease)
            .max(MIN_TIME_LIMIT_SECS)
    });

    LevelConfig {
        game_id: game_id.to_owned(),
        family: profile.family,
        level,
        difficulty: tier(level, LEVELS_PER_DIFFICULTY),
        grid_size,
        complexity: tier(level, LEVELS_PER_COMPLEXITY),
        time_limit,
    }
}

fn tier(level: u64, levels_per_tier: u64) -> u8 {
    let tier = (level / levels_per_tier).saturating_add(1);
    u8::try_from(tier).unwrap_or(MAX_TIER).min(MAX_TIER)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_level_zero() {
        let config = generate_level_config("block-connect", 0);
        assert_eq!(config.level, 0);
        assert_eq!(config.difficulty, 1);
        assert_eq!(config.complexity, 1);
        assert_eq!(config.grid_size, 6);
        assert_eq!(config.time_limit, Some(120));
        assert_eq!(config.family, GameFamily::Block);
    }

    #[test]
    fn test_step_boundaries() {
        assert_eq!(generate_level_config("sudoku", 9).difficulty, 1);
        assert_eq!(generate_level_config("sudoku", 10).difficulty, 2);
        assert_eq!(generate_level_config("sudoku", 49).complexity, 1);
        assert_eq!(generate_level_config("sudoku", 50).complexity, 2);
        assert_eq!(generate_level_config("sudoku", 99).grid_size, 4);
        assert_eq!(generate_level_config("sudoku", 100).grid_size, 5);
        assert_eq!(generate_level_config("sudoku", 90).difficulty, 10);
    }

    #[test]
    fn test_block_connect_at_250() {
        let config = generate_level_config("block-connect", 250);
        assert_eq!(config.difficulty, 10);
        assert_eq!(config.complexity, 6);
    }

    #[test]
    fn test_caps_at_huge_level() {
        for profile in GameProfile::ALL {
            let config = generate_level_config(profile.game_id, 100_000);
            assert_eq!(config.difficulty, 10);
            assert_eq!(config.complexity, 10);
            assert_eq!(config.grid_size, profile.max_grid_size);
        }
        let config = generate_level_config("block-connect", u64::MAX);
        assert_eq!(config.difficulty, 10);
        assert_eq!(config.time_limit, Some(MIN_TIME_LIMIT_SECS));
    }

    #[test]
    fn test_time_limit_only_for_timed_games() {
        assert_eq!(generate_level_config("crossword", 0).time_limit, None);
        assert_eq!(generate_level_config("sudoku", 500).time_limit, None);
        assert_eq!(generate_level_config("color-match", 20).time_limit, Some(119));
        assert_eq!(generate_level_config("color-match", 1800).time_limit, Some(30));
        assert_eq!(generate_level_config("color-match", 5000).time_limit, Some(30));
    }

    #[test]
    fn test_unknown_game_uses_default_profile() {
        let config = generate_level_config("trivia", 0);
        assert_eq!(config.game_id, "trivia");
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.time_limit, None);
        assert_eq!(generate_level_config("trivia", 10_000).grid_size, 10);
    }

    #[test]
    fn test_config_is_pure() {
        assert_eq!(
            generate_level_config("crossword", 321),
            generate_level_config("crossword", 321)
        );
    }

    fn game_id() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "block-connect",
            "color-match",
            "crossword",
            "sudoku",
            "unknown",
        ])
    }

    proptest! {
        #[test]
        fn test_monotonic_in_level(
            game_id in game_id(),
            a in 0_u64..20_000,
            b in 0_u64..20_000,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = generate_level_config(game_id, lo);
            let hi = generate_level_config(game_id, hi);
            prop_assert!(lo.difficulty <= hi.difficulty);
            prop_assert!(lo.complexity <= hi.complexity);
            prop_assert!(lo.grid_size <= hi.grid_size);
            if let (Some(lo), Some(hi)) = (lo.time_limit, hi.time_limit) {
                prop_assert!(lo >= hi);
            }
        }

        #[test]
        fn test_bounds_hold(game_id in game_id(), level in any::<u64>()) {
            let profile = GameProfile::resolve(game_id);
            let config = generate_level_config(game_id, level);
            prop_assert!((1..=MAX_TIER).contains(&config.difficulty));
            prop_assert!((1..=MAX_TIER).contains(&config.complexity));
            prop_assert!(
                (profile.min_grid_size..=profile.max_grid_size).contains(&config.grid_size)
            );
            prop_assert_eq!(config.time_limit.is_some(), profile.has_time_limit);
            if let Some(limit) = config.time_limit {
                prop_assert!(limit >= MIN_TIME_LIMIT_SECS);
            }
        }
    }
}
