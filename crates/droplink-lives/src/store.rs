//! Persistence boundary for lives states.

use std::{collections::HashMap, io, sync::Mutex};

use crate::LivesState;

/// Error reported by a [`LivesStore`].
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[display("lives store I/O failed: {_0}")]
    Io(io::Error),
    /// The store cannot serve requests.
    #[display("lives store unavailable: {reason}")]
    #[from(ignore)]
    Unavailable {
        /// Description of the failure.
        reason: String,
    },
}

/// Durable storage of lives states, keyed by account.
///
/// Writes are conditional: [`LivesStore::compare_and_swap`] only replaces the
/// stored state if it still equals the state the caller read. This is what
/// keeps two sessions of the same account from both spending the last life.
pub trait LivesStore {
    /// Returns the stored state of `account`, or `None` for an unknown account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage cannot be read.
    fn load(&self, account: &str) -> Result<Option<LivesState>, StoreError>;

    /// Replaces the state of `account` with `new` if the stored state equals
    /// `expected` (`None` meaning "no state stored yet").
    ///
    /// Returns `false`, writing nothing, if the stored state differs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage cannot be read or written.
    fn compare_and_swap(
        &self,
        account: &str,
        expected: Option<&LivesState>,
        new: &LivesState,
    ) -> Result<bool, StoreError>;
}

impl<S> LivesStore for &S
where
    S: LivesStore + ?Sized,
{
    fn load(&self, account: &str) -> Result<Option<LivesState>, StoreError> {
        (**self).load(account)
    }

    fn compare_and_swap(
        &self,
        account: &str,
        expected: Option<&LivesState>,
        new: &LivesState,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_swap(account, expected, new)
    }
}

/// An in-process [`LivesStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryLivesStore {
    states: Mutex<HashMap<String, LivesState>>,
}

impl MemoryLivesStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn states(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, LivesState>>, StoreError> {
        self.states.lock().map_err(|_| StoreError::Unavailable {
            reason: "state map lock poisoned".to_owned(),
        })
    }
}

impl LivesStore for MemoryLivesStore {
    fn load(&self, account: &str) -> Result<Option<LivesState>, StoreError> {
        Ok(self.states()?.get(account).cloned())
    }

    fn compare_and_swap(
        &self,
        account: &str,
        expected: Option<&LivesState>,
        new: &LivesState,
    ) -> Result<bool, StoreError> {
        let mut states = self.states()?;
        if states.get(account) != expected {
            return Ok(false);
        }
        states.insert(account.to_owned(), new.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LivesConfig;

    #[test]
    fn test_compare_and_swap() {
        let config = LivesConfig::default();
        let store = MemoryLivesStore::new();
        let full = LivesState::new(&config);
        let mut spent = full.clone();
        spent.use_lives(&config, 1, chrono::Utc::now());

        assert_eq!(store.load("alice").unwrap(), None);
        assert!(!store.compare_and_swap("alice", Some(&full), &spent).unwrap());
        assert!(store.compare_and_swap("alice", None, &full).unwrap());
        assert!(!store.compare_and_swap("alice", None, &spent).unwrap());
        assert!(store.compare_and_swap("alice", Some(&full), &spent).unwrap());
        assert_eq!(store.load("alice").unwrap(), Some(spent));
        assert_eq!(store.load("bob").unwrap(), None);
    }
}
