//! Durable key-value slot port and its in-process implementations.
//!
//! # Design
//! - The store only needs string get/set/delete under one key; backends stay
//!   ignorant of the record shape.
//! - Write and remove failures surface as errors. Read failures are reported
//!   to the store, which treats them as missing data.

use std::collections::HashMap;

use crate::error::{PrefsError, PrefsResult};

/// Durable per-origin key-value storage for serialised records.
pub trait PreferenceSlot {
    /// Fetch the text stored under `key`, or `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    fn read(&self, key: &str) -> PrefsResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the write (e.g. quota).
    fn write(&mut self, key: &str, value: &str) -> PrefsResult<()>;

    /// Delete the entry under `key`; deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the removal.
    fn remove(&mut self, key: &str) -> PrefsResult<()>;
}

/// Map-backed slot that counts writes and can simulate a full backend.
#[derive(Debug, Default, Clone)]
pub struct MemorySlot {
    entries: HashMap<String, String>,
    writes: usize,
    removes: usize,
    write_failure: Option<String>,
    remove_failure: Option<String>,
}

impl MemorySlot {
    /// Empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-populated with `value` under `key`.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slot = Self::default();
        slot.entries.insert(key.into(), value.into());
        slot
    }

    /// Make every subsequent write fail with `detail`.
    pub fn fail_writes(&mut self, detail: impl Into<String>) {
        self.write_failure = Some(detail.into());
    }

    /// Make every subsequent removal fail with `detail`.
    pub fn fail_removes(&mut self, detail: impl Into<String>) {
        self.remove_failure = Some(detail.into());
    }

    /// Let writes and removals succeed again.
    pub fn heal(&mut self) {
        self.write_failure = None;
        self.remove_failure = None;
    }

    /// Raw text stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of successful writes so far.
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of removals so far.
    #[must_use]
    pub const fn remove_count(&self) -> usize {
        self.removes
    }
}

impl PreferenceSlot for MemorySlot {
    fn read(&self, key: &str) -> PrefsResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> PrefsResult<()> {
        if let Some(detail) = &self.write_failure {
            return Err(PrefsError::Storage {
                operation: "write",
                key: key.to_string(),
                detail: detail.clone(),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PrefsResult<()> {
        if let Some(detail) = &self.remove_failure {
            return Err(PrefsError::Storage {
                operation: "remove",
                key: key.to_string(),
                detail: detail.clone(),
            });
        }
        self.entries.remove(key);
        self.removes += 1;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSlot;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use tracing::debug;

    use super::PreferenceSlot;
    use crate::error::{PrefsError, PrefsResult};

    /// Directory-backed slot storing each key as `<dir>/<key>.json`.
    #[derive(Debug, Clone)]
    pub struct FileSlot {
        root: PathBuf,
    }

    impl FileSlot {
        /// Slot rooted at `root`; the directory is created on first write.
        #[must_use]
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        /// Directory holding the slot files.
        #[must_use]
        pub fn root(&self) -> &Path {
            &self.root
        }

        fn path_for(&self, operation: &'static str, key: &str) -> PrefsResult<PathBuf> {
            let unsafe_key = key.is_empty()
                || key.contains(['/', '\\'])
                || key.starts_with('.');
            if unsafe_key {
                return Err(PrefsError::Storage {
                    operation,
                    key: key.to_string(),
                    detail: "key cannot be used as a file name".to_string(),
                });
            }
            Ok(self.root.join(format!("{key}.json")))
        }
    }

    impl PreferenceSlot for FileSlot {
        fn read(&self, key: &str) -> PrefsResult<Option<String>> {
            let path = self.path_for("read", key)?;
            match fs::read_to_string(&path) {
                Ok(text) => Ok(Some(text)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(source) => Err(PrefsError::Io {
                    operation: "slot.read",
                    source,
                }),
            }
        }

        fn write(&mut self, key: &str, value: &str) -> PrefsResult<()> {
            let path = self.path_for("write", key)?;
            fs::create_dir_all(&self.root).map_err(|source| PrefsError::Io {
                operation: "slot.create_dir",
                source,
            })?;
            fs::write(&path, value).map_err(|source| PrefsError::Io {
                operation: "slot.write",
                source,
            })?;
            debug!(path = %path.display(), bytes = value.len(), "slot file written");
            Ok(())
        }

        fn remove(&mut self, key: &str) -> PrefsResult<()> {
            let path = self.path_for("remove", key)?;
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(PrefsError::Io {
                    operation: "slot.remove",
                    source,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn memory_slot_counts_and_fails_writes() -> Result<(), Box<dyn Error>> {
        let mut slot = MemorySlot::new();
        slot.write("k", "one")?;
        slot.write("k", "two")?;
        assert_eq!(slot.get("k"), Some("two"));
        assert_eq!(slot.write_count(), 2);

        slot.fail_writes("quota exceeded");
        let err = slot.write("k", "three");
        assert!(matches!(
            err,
            Err(PrefsError::Storage { operation: "write", .. })
        ));
        assert_eq!(slot.get("k"), Some("two"));

        slot.heal();
        slot.remove("k")?;
        assert_eq!(slot.read("k")?, None);
        assert_eq!(slot.remove_count(), 1);
        Ok(())
    }

    #[test]
    fn file_slot_round_trips_and_tolerates_missing() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let mut slot = FileSlot::new(dir.path().join("prefs"));
        assert_eq!(slot.read("homefix.user")?, None);

        slot.write("homefix.user", "{\"a\":1}")?;
        assert_eq!(slot.read("homefix.user")?.as_deref(), Some("{\"a\":1}"));
        assert!(slot.root().join("homefix.user.json").exists());

        slot.remove("homefix.user")?;
        slot.remove("homefix.user")?;
        assert_eq!(slot.read("homefix.user")?, None);
        Ok(())
    }

    #[test]
    fn file_slot_rejects_path_like_keys() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let mut slot = FileSlot::new(dir.path());
        assert!(slot.write("../escape", "x").is_err());
        assert!(slot.read("nested/key").is_err());
        assert!(slot.remove("").is_err());
        Ok(())
    }
}
