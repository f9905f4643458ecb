//! Atomic lives operations against a [`LivesStore`].

use chrono::{DateTime, Utc};

use crate::{
    Clock, LivesConfig, LivesSnapshot, LivesState, LivesStore, RewardEvent, RewardOutcome,
    StoreError, SystemClock, UseOutcome,
};

/// Error returned by [`LivesService`] operations.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LivesError {
    /// The store failed.
    #[display("{_0}")]
    Store(StoreError),
    /// Every attempt lost a race against another writer of the same account.
    #[display("lives update kept conflicting with concurrent writers after {attempts} attempts")]
    #[from(ignore)]
    Contention {
        /// Number of attempts made.
        attempts: usize,
    },
}

/// Outcome of a lives operation together with the resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivesUpdate<O> {
    /// What the operation did.
    pub outcome: O,
    /// The state after the operation, including regeneration caught up on.
    pub snapshot: LivesSnapshot,
}

/// Applies lives operations atomically.
///
/// Each operation loads the account's state, credits regeneration elapsed
/// since the last write, applies the change, and writes it back with
/// compare-and-swap. If another writer got in between, the operation starts
/// over from the fresh state, so a read-compute-write race can never lose an
/// update or spend a life twice.
///
/// # Examples
///
/// ```
/// use droplink_lives::{LivesConfig, LivesService, MemoryLivesStore};
///
/// let service = LivesService::new(MemoryLivesStore::new(), LivesConfig::default());
///
/// for _ in 0..3 {
///     assert!(service.use_lives("player", 1).unwrap().outcome.is_used());
/// }
/// let update = service.use_lives("player", 5).unwrap();
/// assert!(update.outcome.is_declined());
/// assert_eq!(update.snapshot.count, 2);
/// ```
#[derive(Debug)]
pub struct LivesService<S, C = SystemClock> {
    store: S,
    clock: C,
    config: LivesConfig,
    max_attempts: usize,
}

impl<S> LivesService<S>
where
    S: LivesStore,
{
    /// Creates a service using the system clock.
    #[must_use]
    pub fn new(store: S, config: LivesConfig) -> Self {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S, C> LivesService<S, C>
where
    S: LivesStore,
    C: Clock,
{
    /// Default number of compare-and-swap attempts per operation.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

    /// Creates a service reading the time from `clock`.
    #[must_use]
    pub fn with_clock(store: S, config: LivesConfig, clock: C) -> Self {
        Self {
            store,
            clock,
            config,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets how many times an operation is attempted before giving up with
    /// [`LivesError::Contention`].
    #[must_use]
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LivesConfig {
        &self.config
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the current state of `account`, persisting any regeneration
    /// that happened since the last write.
    ///
    /// # Errors
    ///
    /// Returns [`LivesError`] if the store fails or the write keeps conflicting.
    pub fn status(&self, account: &str) -> Result<LivesSnapshot, LivesError> {
        self.update(account, |_, _, _| ())
            .map(|update| update.snapshot)
    }

    /// Spends `n` lives of `account`.
    ///
    /// Running out of lives is not an error: the outcome is
    /// [`UseOutcome::Declined`] and the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LivesError`] if the store fails or the write keeps conflicting.
    pub fn use_lives(&self, account: &str, n: u32) -> Result<LivesUpdate<UseOutcome>, LivesError> {
        let update = self.update(account, |state, config, now| state.use_lives(config, n, now))?;
        if let UseOutcome::Declined {
            available,
            requested,
        } = update.outcome
        {
            log::warn!("declined use of {requested} lives by {account:?}: {available} available");
        }
        Ok(update)
    }

    /// Credits a confirmed reward to `account`.
    ///
    /// A reward whose key was already credited reports
    /// [`RewardOutcome::Duplicate`] and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LivesError`] if the store fails or the write keeps conflicting.
    pub fn reward(
        &self,
        account: &str,
        event: &RewardEvent,
    ) -> Result<LivesUpdate<RewardOutcome>, LivesError> {
        let update = self.update(account, |state, config, _| state.credit(config, event))?;
        match update.outcome {
            RewardOutcome::Credited { added } => log::debug!(
                "credited {added} lives to {account:?} for {} {:?}",
                event.kind,
                event.key
            ),
            RewardOutcome::Duplicate => {
                log::warn!("ignored duplicate {} reward {:?}", event.kind, event.key);
            }
        }
        Ok(update)
    }

    fn update<O, F>(&self, account: &str, mut op: F) -> Result<LivesUpdate<O>, LivesError>
    where
        F: FnMut(&mut LivesState, &LivesConfig, DateTime<Utc>) -> O,
    {
        for attempt in 1..=self.max_attempts {
            let now = self.clock.now();
            let stored = self.store.load(account)?;
            let mut state = stored
                .clone()
                .unwrap_or_else(|| LivesState::new(&self.config));
            state.catch_up(&self.config, now);
            let outcome = op(&mut state, &self.config, now);
            let update = LivesUpdate {
                outcome,
                snapshot: state.snapshot(&self.config),
            };

            if stored.as_ref() == Some(&state)
                || self
                    .store
                    .compare_and_swap(account, stored.as_ref(), &state)?
            {
                return Ok(update);
            }
            log::warn!("lives of {account:?} changed concurrently (attempt {attempt})");
        }
        Err(LivesError::Contention {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, thread};

    use chrono::{TimeDelta, TimeZone as _};

    use super::*;
    use crate::{ManualClock, MemoryLivesStore, RewardKind};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn service() -> LivesService<MemoryLivesStore, ManualClock> {
        LivesService::with_clock(
            MemoryLivesStore::new(),
            LivesConfig::default(),
            ManualClock::new(start()),
        )
    }

    #[test]
    fn test_fresh_account() {
        let service = service();
        let snapshot = service.status("new").unwrap();
        assert_eq!(snapshot.count, 5);
        assert_eq!(snapshot.max, 5);
        assert_eq!(snapshot.next_regen_at, None);
    }

    #[test]
    fn test_uses_then_declined() {
        let service = service();
        for remaining in [4, 3, 2] {
            let update = service.use_lives("p", 1).unwrap();
            assert_eq!(update.outcome, UseOutcome::Used { remaining });
        }
        let update = service.use_lives("p", 5).unwrap();
        assert!(update.outcome.is_declined());
        assert_eq!(service.status("p").unwrap().count, 2);
    }

    #[test]
    fn test_regeneration_caught_up_on_resume() {
        let service = service();
        service.use_lives("p", 4).unwrap();
        service.clock().advance(TimeDelta::minutes(95));

        let snapshot = service.status("p").unwrap();
        assert_eq!(snapshot.count, 4);
        assert_eq!(snapshot.next_regen_at, Some(start() + TimeDelta::minutes(120)));
        assert_eq!(
            snapshot.time_until_next(service.clock().now()),
            Some(TimeDelta::minutes(25))
        );

        let stored = service.store().load("p").unwrap().unwrap();
        assert_eq!(stored.count(), 4);
    }

    #[test]
    fn test_stored_state_without_timer_regenerates() {
        let service = service();
        let stalled: LivesState =
            serde_json::from_str(r#"{"count":1,"regen_anchor":null}"#).unwrap();
        assert!(service.store().compare_and_swap("p", None, &stalled).unwrap());

        let snapshot = service.status("p").unwrap();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.next_regen_at, Some(start() + TimeDelta::minutes(30)));
        let stored = service.store().load("p").unwrap().unwrap();
        assert_eq!(stored.regen_anchor(), Some(start()));

        service.clock().advance(TimeDelta::minutes(30));
        assert_eq!(service.status("p").unwrap().count, 2);
    }

    #[test]
    fn test_reward_is_idempotent() {
        let service = service();
        service.use_lives("p", 3).unwrap();
        let event = RewardEvent::new(RewardKind::AdWatch, 1, "impression-9");
        let first = service.reward("p", &event).unwrap();
        assert_eq!(first.outcome, RewardOutcome::Credited { added: 1 });
        let second = service.reward("p", &event).unwrap();
        assert_eq!(second.outcome, RewardOutcome::Duplicate);
        assert_eq!(second.snapshot.count, 3);
    }

    /// Spends a life behind the service's back before each of the first
    /// `interferences` writes.
    struct RacingStore {
        inner: MemoryLivesStore,
        interferences: Mutex<usize>,
    }

    impl LivesStore for RacingStore {
        fn load(&self, account: &str) -> Result<Option<LivesState>, StoreError> {
            self.inner.load(account)
        }

        fn compare_and_swap(
            &self,
            account: &str,
            expected: Option<&LivesState>,
            new: &LivesState,
        ) -> Result<bool, StoreError> {
            let mut interferences = self.interferences.lock().unwrap();
            if *interferences > 0 {
                *interferences -= 1;
                let config = LivesConfig::default();
                let current = self.inner.load(account)?;
                let mut other = current.clone().unwrap_or_else(|| LivesState::new(&config));
                other.use_lives(&config, 1, start());
                assert!(self.inner.compare_and_swap(account, current.as_ref(), &other)?);
            }
            self.inner.compare_and_swap(account, expected, new)
        }
    }

    #[test]
    fn test_retries_after_concurrent_write() {
        let store = RacingStore {
            inner: MemoryLivesStore::new(),
            interferences: Mutex::new(2),
        };
        let service =
            LivesService::with_clock(store, LivesConfig::default(), ManualClock::new(start()));
        let update = service.use_lives("p", 1).unwrap();
        assert_eq!(update.outcome, UseOutcome::Used { remaining: 2 });
        assert_eq!(service.status("p").unwrap().count, 2);
    }

    #[test]
    fn test_contention_error() {
        let store = RacingStore {
            inner: MemoryLivesStore::new(),
            interferences: Mutex::new(usize::MAX),
        };
        let service =
            LivesService::with_clock(store, LivesConfig::default(), ManualClock::new(start()))
                .max_attempts(3);
        let err = service.use_lives("p", 1).unwrap_err();
        assert!(matches!(err, LivesError::Contention { attempts: 3 }));
    }

    #[test]
    fn test_last_life_spent_once() {
        let config = LivesConfig::default();
        let store = MemoryLivesStore::new();
        let clock = ManualClock::new(start());
        let last = LivesState::with_count(&config, 1, start());
        assert!(store.compare_and_swap("p", None, &last).unwrap());

        let service = LivesService::with_clock(&store, config, &clock);
        let outcomes: Vec<UseOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| service.use_lives("p", 1).unwrap().outcome))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(outcomes.iter().filter(|o| o.is_used()).count(), 1);
        assert_eq!(store.load("p").unwrap().unwrap().count(), 0);
    }
}
