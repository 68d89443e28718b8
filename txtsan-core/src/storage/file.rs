//! Directory-backed `KeyValueStore`: one file per key.
//!
//! Writes go to a temporary file that is renamed over the target, so readers
//! never observe a half-written value. Compare-and-swap and put-if-absent
//! hold an exclusive advisory lock on a per-key lock file for the whole
//! read-compare-write sequence, which also serializes writers living in
//! other processes.

use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{check_revision, KeyValueStore, Revision, StorageKey, Versioned};
use crate::errors::PersistenceError;

const TMP_SUFFIX: &str = ".tmp";
const LOCK_SUFFIX: &str = ".lock";

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| PersistenceError::Io {
            key: root.display().to_string(),
            source,
        })?;
        debug!("Opened file store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn sibling(&self, key: &StorageKey, suffix: &str) -> PathBuf {
        self.root.join(format!("{}{}", key.file_name(), suffix))
    }

    fn read_bytes(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(io_error(key, source)),
        }
    }

    fn write_bytes(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), PersistenceError> {
        let tmp_path = self.sibling(key, TMP_SUFFIX);
        {
            let mut tmp = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)
                .map_err(|source| io_error(key, source))?;
            tmp.write_all(bytes).map_err(|source| io_error(key, source))?;
            tmp.flush().map_err(|source| io_error(key, source))?;
        }
        fs::rename(&tmp_path, self.path_for(key)).map_err(|source| io_error(key, source))
    }

    /// Runs `f` while holding the exclusive lock for `key`.
    fn with_lock<T>(
        &self,
        key: &StorageKey,
        f: impl FnOnce() -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let lock_file: File = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.sibling(key, LOCK_SUFFIX))
            .map_err(|source| io_error(key, source))?;
        fs2::FileExt::lock_exclusive(&lock_file).map_err(|source| io_error(key, source))?;
        let result = f();
        fs2::FileExt::unlock(&lock_file).map_err(|source| io_error(key, source))?;
        result
    }
}

fn io_error(key: &StorageKey, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io { key: key.to_string(), source }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &StorageKey) -> Result<Option<Versioned>, PersistenceError> {
        Ok(self.read_bytes(key)?.map(Versioned::new))
    }

    fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        expected: Option<&Revision>,
    ) -> Result<Revision, PersistenceError> {
        self.with_lock(key, || {
            let current = self.read_bytes(key)?;
            check_revision(key, current.as_deref(), expected)?;
            self.write_bytes(key, &bytes)?;
            debug!("Wrote {} bytes to '{}'", bytes.len(), key);
            Ok(Revision::of(&bytes))
        })
    }

    fn put_if_absent(&self, key: &StorageKey, bytes: Vec<u8>) -> Result<Vec<u8>, PersistenceError> {
        self.with_lock(key, || match self.read_bytes(key)? {
            Some(existing) => Ok(existing),
            None => {
                self.write_bytes(key, &bytes)?;
                Ok(bytes)
            }
        })
    }
}
