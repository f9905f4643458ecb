//! The lives state machine.
//!
//! Regeneration has no live timer. The state keeps the instant the current
//! regeneration period started, and [`LivesState::catch_up`] credits every
//! whole period elapsed since then. Calling it on every read keeps the count
//! correct across restarts and long absences.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{LivesConfig, RewardEvent};

/// Result of spending lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum UseOutcome {
    /// The lives were spent.
    Used {
        /// Lives left afterwards.
        remaining: u32,
    },
    /// Not enough lives; nothing changed.
    Declined {
        /// Lives available.
        available: u32,
        /// Lives requested.
        requested: u32,
    },
}

/// Result of crediting a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RewardOutcome {
    /// The reward was applied.
    Credited {
        /// Lives actually added after capping at the maximum.
        added: u32,
    },
    /// The reward key was already credited; nothing changed.
    Duplicate,
}

/// The presentation view of a lives state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivesSnapshot {
    /// Current life count.
    pub count: u32,
    /// Upper bound of the count.
    pub max: u32,
    /// When the next life arrives, if one is pending.
    pub next_regen_at: Option<DateTime<Utc>>,
}

impl LivesSnapshot {
    /// Returns the time left until the next life, or `None` if the count is full.
    #[must_use]
    pub fn time_until_next(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.next_regen_at
            .map(|at| (at - now).max(TimeDelta::zero()))
    }
}

/// Life count of one account together with its regeneration timer.
///
/// The count stays within `0..=max_lives`. While it is below the maximum,
/// `regen_anchor` holds the start of the running regeneration period; at the
/// maximum there is no timer.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use droplink_lives::{LivesConfig, LivesState};
///
/// let config = LivesConfig::default();
/// let start = Utc::now();
/// let mut state = LivesState::new(&config);
///
/// assert!(state.use_lives(&config, 2, start).is_used());
/// assert_eq!(state.count(), 3);
///
/// // 95 minutes later three whole periods have passed.
/// assert_eq!(state.catch_up(&config, start + TimeDelta::minutes(95)), 2);
/// assert_eq!(state.count(), 5);
/// assert_eq!(state.regen_anchor(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivesState {
    count: u32,
    regen_anchor: Option<DateTime<Utc>>,
    #[serde(default)]
    recent_reward_keys: VecDeque<String>,
}

impl LivesState {
    /// Creates the state of a fresh account: full lives, no timer.
    #[must_use]
    pub fn new(config: &LivesConfig) -> Self {
        Self {
            count: config.max_lives,
            regen_anchor: None,
            recent_reward_keys: VecDeque::new(),
        }
    }

    /// Creates a state with `count` lives (capped at the maximum) and a timer
    /// started at `regen_anchor` if the count is below the maximum.
    #[must_use]
    pub fn with_count(config: &LivesConfig, count: u32, regen_anchor: DateTime<Utc>) -> Self {
        let count = count.min(config.max_lives);
        Self {
            count,
            regen_anchor: (count < config.max_lives).then_some(regen_anchor),
            recent_reward_keys: VecDeque::new(),
        }
    }

    /// Returns the current life count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the start of the running regeneration period.
    #[must_use]
    pub fn regen_anchor(&self) -> Option<DateTime<Utc>> {
        self.regen_anchor
    }

    /// Returns `true` if the count is at the maximum.
    #[must_use]
    pub fn is_full(&self, config: &LivesConfig) -> bool {
        self.count >= config.max_lives
    }

    /// Returns when the next life arrives, if the count is below the maximum.
    #[must_use]
    pub fn next_regen_at(&self, config: &LivesConfig) -> Option<DateTime<Utc>> {
        self.regen_anchor
            .and_then(|anchor| anchor.checked_add_signed(config.regen_period()))
    }

    /// Returns the time left until the next life, clamped at zero.
    ///
    /// Meant to be recomputed for a countdown display; it never changes the state.
    #[must_use]
    pub fn time_until_next(&self, config: &LivesConfig, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.snapshot(config).time_until_next(now)
    }

    /// Returns the presentation view of the state.
    #[must_use]
    pub fn snapshot(&self, config: &LivesConfig) -> LivesSnapshot {
        LivesSnapshot {
            count: self.count,
            max: config.max_lives,
            next_regen_at: self.next_regen_at(config),
        }
    }

    /// Credits every whole regeneration period elapsed since the timer started.
    ///
    /// Adds `min(elapsed / period, max - count)` lives. If the count reaches the
    /// maximum the timer is cleared, otherwise it advances by the credited
    /// periods so the partial period carries over. A state below the maximum
    /// without a timer, as can be read from an old or hand-edited file, starts
    /// its timer at `now`. Returns the lives added.
    pub fn catch_up(&mut self, config: &LivesConfig, now: DateTime<Utc>) -> u32 {
        if self.is_full(config) {
            self.count = config.max_lives;
            self.regen_anchor = None;
            return 0;
        }
        let Some(anchor) = self.regen_anchor else {
            log::debug!("restarting the stopped regeneration timer at {now}");
            self.regen_anchor = Some(now);
            return 0;
        };

        let period = config.regen_period();
        let elapsed = now - anchor;
        if elapsed < period {
            return 0;
        }
        let periods = elapsed.num_seconds() / period.num_seconds();
        let missing = config.max_lives - self.count;
        let added = u32::try_from(periods).map_or(missing, |periods| periods.min(missing));

        self.count += added;
        self.regen_anchor = if self.is_full(config) {
            None
        } else {
            i32::try_from(added)
                .ok()
                .and_then(|n| period.checked_mul(n))
                .and_then(|advance| anchor.checked_add_signed(advance))
        };
        log::debug!("regenerated {added} lives, count is now {}", self.count);
        added
    }

    /// Applies a single elapsed regeneration timer.
    ///
    /// Adds one life if below the maximum and restarts the timer at `now`, or
    /// clears it once the maximum is reached. Returns `false` if already full.
    pub fn regenerate_one(&mut self, config: &LivesConfig, now: DateTime<Utc>) -> bool {
        if self.is_full(config) {
            self.regen_anchor = None;
            return false;
        }
        self.count += 1;
        self.regen_anchor = (!self.is_full(config)).then_some(now);
        true
    }

    /// Spends `n` lives if at least `n` are available.
    ///
    /// Starts the regeneration timer at `now` if the count drops below the
    /// maximum and no timer is running. A declined use leaves the state
    /// unchanged.
    pub fn use_lives(&mut self, config: &LivesConfig, n: u32, now: DateTime<Utc>) -> UseOutcome {
        if self.count < n {
            return UseOutcome::Declined {
                available: self.count,
                requested: n,
            };
        }
        self.count -= n;
        if !self.is_full(config) && self.regen_anchor.is_none() {
            self.regen_anchor = Some(now);
        }
        UseOutcome::Used {
            remaining: self.count,
        }
    }

    /// Adds up to `n` lives, capped at the maximum. Clears the timer once full.
    ///
    /// Returns the lives actually added.
    pub fn add_lives(&mut self, config: &LivesConfig, n: u32) -> u32 {
        let before = self.count;
        self.count = self.count.saturating_add(n).min(config.max_lives);
        if self.is_full(config) {
            self.regen_anchor = None;
        }
        self.count - before
    }

    /// Credits a reward unless its key was credited before.
    ///
    /// The last [`LivesConfig::reward_history`] keys are remembered.
    pub fn credit(&mut self, config: &LivesConfig, event: &RewardEvent) -> RewardOutcome {
        if self.recent_reward_keys.contains(&event.key) {
            return RewardOutcome::Duplicate;
        }
        let added = self.add_lives(config, event.amount);
        self.recent_reward_keys.push_back(event.key.clone());
        while self.recent_reward_keys.len() > config.reward_history {
            self.recent_reward_keys.pop_front();
        }
        RewardOutcome::Credited { added }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use proptest::prelude::*;

    use super::*;
    use crate::RewardKind;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn minutes(m: i64) -> DateTime<Utc> {
        t0() + TimeDelta::minutes(m)
    }

    #[test]
    fn test_fresh_account_is_full() {
        let config = LivesConfig::default();
        let state = LivesState::new(&config);
        assert_eq!(state.count(), 5);
        assert_eq!(state.regen_anchor(), None);
        assert_eq!(state.time_until_next(&config, t0()), None);
    }

    #[test]
    fn test_three_uses_then_declined() {
        let config = LivesConfig::default();
        let mut state = LivesState::new(&config);
        for remaining in [4, 3, 2] {
            assert_eq!(
                state.use_lives(&config, 1, t0()),
                UseOutcome::Used { remaining }
            );
        }
        let before = state.clone();
        assert_eq!(
            state.use_lives(&config, 5, t0()),
            UseOutcome::Declined {
                available: 2,
                requested: 5
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_use_starts_timer_once() {
        let config = LivesConfig::default();
        let mut state = LivesState::new(&config);
        state.use_lives(&config, 1, t0());
        assert_eq!(state.regen_anchor(), Some(t0()));
        state.use_lives(&config, 1, minutes(10));
        assert_eq!(state.regen_anchor(), Some(t0()));
        assert_eq!(state.next_regen_at(&config), Some(minutes(30)));
        assert_eq!(
            state.time_until_next(&config, minutes(12)),
            Some(TimeDelta::minutes(18))
        );
    }

    #[test]
    fn test_catch_up_credits_whole_periods() {
        let config = LivesConfig::default();
        let mut state = LivesState::with_count(&config, 1, t0());
        assert_eq!(state.catch_up(&config, minutes(95)), 3);
        assert_eq!(state.count(), 4);
        assert_eq!(state.regen_anchor(), Some(minutes(90)));
        assert_eq!(
            state.time_until_next(&config, minutes(95)),
            Some(TimeDelta::minutes(25))
        );
    }

    #[test]
    fn test_catch_up_caps_at_max() {
        let config = LivesConfig::default();
        let mut state = LivesState::with_count(&config, 3, t0());
        assert_eq!(state.catch_up(&config, minutes(95)), 2);
        assert!(state.is_full(&config));
        assert_eq!(state.regen_anchor(), None);
    }

    #[test]
    fn test_catch_up_before_first_period() {
        let config = LivesConfig::default();
        let mut state = LivesState::with_count(&config, 2, t0());
        assert_eq!(state.catch_up(&config, minutes(29)), 0);
        assert_eq!(state.catch_up(&config, minutes(-5)), 0);
        assert_eq!(state.regen_anchor(), Some(t0()));
        assert_eq!(state.time_until_next(&config, minutes(45)), Some(TimeDelta::zero()));
    }

    #[test]
    fn test_catch_up_restarts_missing_timer() {
        let config = LivesConfig::default();
        let mut state: LivesState =
            serde_json::from_str(r#"{"count":2,"regen_anchor":null}"#).unwrap();
        assert_eq!(state.next_regen_at(&config), None);

        assert_eq!(state.catch_up(&config, t0()), 0);
        assert_eq!(state.regen_anchor(), Some(t0()));
        assert_eq!(state.next_regen_at(&config), Some(minutes(30)));

        assert_eq!(state.catch_up(&config, minutes(65)), 2);
        assert_eq!(state.count(), 4);
        assert_eq!(state.regen_anchor(), Some(minutes(60)));
    }

    #[test]
    fn test_regenerate_one() {
        let config = LivesConfig::default();
        let mut state = LivesState::with_count(&config, 3, t0());
        assert!(state.regenerate_one(&config, minutes(30)));
        assert_eq!(state.regen_anchor(), Some(minutes(30)));
        assert!(state.regenerate_one(&config, minutes(60)));
        assert_eq!(state.count(), 5);
        assert_eq!(state.regen_anchor(), None);
        assert!(!state.regenerate_one(&config, minutes(90)));
    }

    #[test]
    fn test_reward_caps_and_clears_timer() {
        let config = LivesConfig::default();
        let mut state = LivesState::with_count(&config, 1, t0());
        let event = RewardEvent::new(RewardKind::Payment, 10, "tx-1");
        assert_eq!(
            state.credit(&config, &event),
            RewardOutcome::Credited { added: 4 }
        );
        assert_eq!(state.count(), 5);
        assert_eq!(state.regen_anchor(), None);
    }

    #[test]
    fn test_reward_below_max_keeps_timer() {
        let config = LivesConfig::default();
        let mut state = LivesState::with_count(&config, 1, t0());
        assert_eq!(state.add_lives(&config, 1), 1);
        assert_eq!(state.regen_anchor(), Some(t0()));
    }

    #[test]
    fn test_duplicate_reward_key() {
        let config = LivesConfig::default().reward_history(2);
        let mut state = LivesState::with_count(&config, 0, t0());
        let first = RewardEvent::new(RewardKind::AdWatch, 1, "ad-1");
        assert!(state.credit(&config, &first).is_credited());
        assert_eq!(state.credit(&config, &first), RewardOutcome::Duplicate);
        assert_eq!(state.count(), 1);

        // Only the last two keys are remembered.
        state.credit(&config, &RewardEvent::new(RewardKind::AdWatch, 1, "ad-2"));
        state.credit(&config, &RewardEvent::new(RewardKind::AdWatch, 1, "ad-3"));
        assert!(state.credit(&config, &first).is_credited());
        assert_eq!(state.count(), 4);
    }

    #[test]
    fn test_state_json_roundtrip() {
        let config = LivesConfig::default();
        let mut state = LivesState::new(&config);
        state.use_lives(&config, 2, t0());
        state.credit(&config, &RewardEvent::new(RewardKind::AdWatch, 1, "ad-1"));
        let json = serde_json::to_string(&state).unwrap();
        let restored: LivesState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Use(u32),
        Reward(u32, u8),
        Regenerate,
        Wait(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0_u32..7).prop_map(Op::Use),
            (0_u32..7, any::<u8>()).prop_map(|(n, key)| Op::Reward(n, key)),
            Just(Op::Regenerate),
            (0_i64..200).prop_map(Op::Wait),
        ]
    }

    proptest! {
        #[test]
        fn test_count_stays_in_bounds(ops in prop::collection::vec(op(), 0..64)) {
            let config = LivesConfig::default();
            let mut state = LivesState::new(&config);
            let mut now = t0();
            for op in ops {
                let before = state.count();
                match op {
                    Op::Use(n) => {
                        let outcome = state.use_lives(&config, n, now);
                        prop_assert_eq!(outcome.is_declined(), before < n);
                        if outcome.is_declined() {
                            prop_assert_eq!(state.count(), before);
                        }
                    }
                    Op::Reward(n, key) => {
                        let event = RewardEvent::new(RewardKind::AdWatch, n, key.to_string());
                        state.credit(&config, &event);
                    }
                    Op::Regenerate => {
                        state.regenerate_one(&config, now);
                    }
                    Op::Wait(m) => {
                        now += TimeDelta::minutes(m);
                        state.catch_up(&config, now);
                    }
                }
                prop_assert!(state.count() <= config.max_lives);
                prop_assert_eq!(state.regen_anchor().is_none(), state.is_full(&config));
            }
        }
    }
}
