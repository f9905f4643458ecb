//! Lives states persisted in a JSON file.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs::{self, File},
    io::{self, BufReader, BufWriter, ErrorKind, Write as _},
    path::{Path, PathBuf},
    sync::Mutex,
};

use droplink_lives::{LivesState, LivesStore, StoreError};

type States = BTreeMap<String, LivesState>;

/// A [`LivesStore`] keeping every account's state in one JSON object.
///
/// A missing file is an empty store. Compare-and-swap is serialized by a lock
/// held for the read-compare-write cycle, so it is atomic within one process
/// only. Writes go to a sibling `.tmp` file that is then renamed over the
/// backing file, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::debug!("lives state file: {}", path.display());
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_states(&self) -> Result<States, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(States::new()),
            Err(err) => return Err(err.into()),
        };
        let states = serde_json::from_reader(BufReader::new(file)).map_err(io::Error::from)?;
        Ok(states)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_states(&self, states: &States) -> Result<(), StoreError> {
        let temp = self.temp_path();
        let written = write_json(&temp, states).and_then(|()| fs::rename(&temp, &self.path));
        if let Err(err) = written {
            log::warn!("failed to write {}: {err}", self.path.display());
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        Ok(())
    }
}

fn write_json(path: &Path, states: &States) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, states)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

impl LivesStore for JsonFileStore {
    fn load(&self, account: &str) -> Result<Option<LivesState>, StoreError> {
        Ok(self.read_states()?.remove(account))
    }

    fn compare_and_swap(
        &self,
        account: &str,
        expected: Option<&LivesState>,
        new: &LivesState,
    ) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Unavailable {
            reason: "state file lock poisoned".to_owned(),
        })?;
        let mut states = self.read_states()?;
        if states.get(account) != expected {
            return Ok(false);
        }
        states.insert(account.to_owned(), new.clone());
        self.write_states(&states)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use chrono::{TimeZone as _, Utc};
    use droplink_lives::{LivesConfig, LivesService, ManualClock, UseOutcome};

    use super::*;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str) -> Self {
            static COUNTER: AtomicUsize = AtomicUsize::new(0);
            let id = COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = env::temp_dir().join(format!(
                "droplink-{name}-{}-{id}.json",
                std::process::id()
            ));
            let _ = fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
            let _ = fs::remove_file(self.0.with_extension("json.tmp"));
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let file = TempFile::new("missing");
        let store = JsonFileStore::new(&file.0);
        assert_eq!(store.load("alice").unwrap(), None);
    }

    #[test]
    fn test_compare_and_swap_persists() {
        let file = TempFile::new("cas");
        let config = LivesConfig::default();
        let store = JsonFileStore::new(&file.0);
        let full = LivesState::new(&config);
        let mut spent = full.clone();
        spent.use_lives(&config, 2, Utc::now());

        assert!(store.compare_and_swap("alice", None, &full).unwrap());
        assert!(!store.compare_and_swap("alice", None, &spent).unwrap());
        assert!(store.compare_and_swap("alice", Some(&full), &spent).unwrap());
        assert!(store.compare_and_swap("bob", None, &full).unwrap());

        let reopened = JsonFileStore::new(&file.0);
        assert_eq!(reopened.load("alice").unwrap(), Some(spent));
        assert_eq!(reopened.load("bob").unwrap(), Some(full));
    }

    #[test]
    fn test_write_replaces_file_atomically() {
        let file = TempFile::new("atomic");
        let config = LivesConfig::default();
        let store = JsonFileStore::new(&file.0);
        let full = LivesState::new(&config);
        let mut spent = full.clone();
        spent.use_lives(&config, 1, Utc::now());

        assert!(store.compare_and_swap("alice", None, &full).unwrap());
        assert!(store.compare_and_swap("alice", Some(&full), &spent).unwrap());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load("alice").unwrap(), Some(spent.clone()));

        // A leftover from an interrupted write does not affect the store.
        fs::write(store.temp_path(), "{ partial").unwrap();
        assert_eq!(store.load("alice").unwrap(), Some(spent.clone()));
        assert!(store.compare_and_swap("alice", Some(&spent), &full).unwrap());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load("alice").unwrap(), Some(full));
    }

    #[test]
    fn test_failed_write_keeps_previous_contents() {
        let file = TempFile::new("blocked");
        let config = LivesConfig::default();
        let store = JsonFileStore::new(&file.0);
        let full = LivesState::new(&config);
        assert!(store.compare_and_swap("alice", None, &full).unwrap());

        fs::create_dir(store.temp_path()).unwrap();
        let mut spent = full.clone();
        spent.use_lives(&config, 1, Utc::now());
        let result = store.compare_and_swap("alice", Some(&full), &spent);
        fs::remove_dir(store.temp_path()).unwrap();

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(store.load("alice").unwrap(), Some(full));
    }

    #[test]
    fn test_corrupt_file_is_io_error() {
        let file = TempFile::new("corrupt");
        fs::write(&file.0, "{ not json").unwrap();
        let store = JsonFileStore::new(&file.0);
        assert!(matches!(store.load("alice"), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_service_over_file() {
        let file = TempFile::new("service");
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap());
        let service = LivesService::with_clock(
            JsonFileStore::new(&file.0),
            LivesConfig::default(),
            &clock,
        );

        for remaining in (2..=4).rev() {
            let update = service.use_lives("alice", 1).unwrap();
            assert_eq!(update.outcome, UseOutcome::Used { remaining });
        }
        let declined = service.use_lives("alice", 5).unwrap();
        assert!(declined.outcome.is_declined());
        assert_eq!(service.status("alice").unwrap().count, 2);
    }
}
