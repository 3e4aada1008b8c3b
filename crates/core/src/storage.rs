//! Local storage backends.
//!
//! Every store persists its whole collection as one JSON document under one key, in the same
//! way a browser keeps `localStorage` entries. This module provides:
//!
//! - the [`LocalStorage`] trait (string values addressed by [`StorageKey`]),
//! - [`MemoryStorage`], a process-local map used by tests and throwaway sessions,
//! - [`FileStorage`], one `<key>.json` file per entry under a data directory,
//! - [`load_json`] / [`persist_json`], the hydrate-or-fallback and full-write rules shared by
//!   all stores.
//!
//! ## File layout
//!
//! ```text
//! <data_dir>/
//!   articles.json
//!   appointments.json
//!   userProfile.json
//! ```
//!
//! Writes go to `<key>.json.tmp` first and are renamed into place, so a reader never sees a
//! half-written document. Two processes sharing a directory still race: the last rename wins.

use crate::constants::STORE_FILE_EXTENSION;
use crate::{StoreError, StoreResult};
use careportal_types::StorageKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key-value string storage with the semantics of browser local storage.
///
/// Implementations take `&self` for writes so one backend can be shared by every store.
pub trait LocalStorage: Debug + Send + Sync {
    /// Returns the stored value, or `None` if the key has never been written or was removed.
    fn get_item(&self, key: &StorageKey) -> StoreResult<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set_item(&self, key: &StorageKey, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &StorageKey) -> StoreResult<()>;

    /// Lists the keys currently holding a value, sorted.
    fn keys(&self) -> StoreResult<Vec<StorageKey>>;
}

/// In-memory storage. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<BTreeMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &StorageKey) -> StoreResult<Option<String>> {
        let items = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &StorageKey, value: &str) -> StoreResult<()> {
        let mut items = self.items.write().map_err(|_| StoreError::LockPoisoned)?;
        items.insert(key.clone(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &StorageKey) -> StoreResult<()> {
        let mut items = self.items.write().map_err(|_| StoreError::LockPoisoned)?;
        items.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<StorageKey>> {
        let items = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(items.keys().cloned().collect())
    }
}

/// File-backed storage: one JSON file per key under `dir`.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageDirCreation`] if the directory cannot be created, or
    /// [`StoreError::InvalidInput`] if `dir` exists but is not a directory.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        if dir.exists() && !dir.is_dir() {
            return Err(StoreError::InvalidInput(format!(
                "storage path is not a directory: {}",
                dir.display()
            )));
        }
        fs::create_dir_all(dir).map_err(StoreError::StorageDirCreation)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`.
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key.as_str(), STORE_FILE_EXTENSION))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &StorageKey) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::FileRead(e)),
        }
    }

    fn set_item(&self, key: &StorageKey, value: &str) -> StoreResult<()> {
        let target = self.path_for(key);
        let staging = target.with_extension(format!("{STORE_FILE_EXTENSION}.tmp"));
        fs::write(&staging, value).map_err(StoreError::FileWrite)?;
        fs::rename(&staging, &target).map_err(StoreError::FileWrite)
    }

    fn remove_item(&self, key: &StorageKey) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::FileRemove(e)),
        }
    }

    fn keys(&self) -> StoreResult<Vec<StorageKey>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(StoreError::FileRead)? {
            let path = entry.map_err(StoreError::FileRead)?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(STORE_FILE_EXTENSION)
            {
                continue;
            }
            // Files that do not name a valid key were not written by us.
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| StorageKey::new(s).ok())
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Outcome of reading one store's document at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum Hydrated<T> {
    /// A well-formed document was found.
    Loaded(T),
    /// Nothing has been persisted under the key.
    Missing,
    /// Something was persisted but could not be read or parsed; it has been ignored.
    Discarded,
}

impl<T> Hydrated<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            Hydrated::Loaded(value) => Some(value),
            Hydrated::Missing | Hydrated::Discarded => None,
        }
    }
}

/// What hydration does when it falls back to seed or default data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fallback {
    /// Write the fallback collection back so storage matches memory.
    #[default]
    WriteBack,
    /// Keep the fallback in memory only. Storage is untouched until the first mutation.
    InMemory,
}

/// Parses a persisted JSON document.
///
/// Uses `serde_path_to_error` to surface a best-effort path (e.g. `[2].authorType`) to the
/// failing field. Trailing content after the document is an error.
pub fn parse_json<T: DeserializeOwned>(key: &StorageKey, raw: &str) -> StoreResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let mismatch = |path: String, message: String| StoreError::Deserialization {
        key: key.to_string(),
        path: if path.is_empty() || path == "." {
            "<root>".into()
        } else {
            path
        },
        message,
    };

    let value = match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            return Err(mismatch(path, err.into_inner().to_string()));
        }
    };
    deserializer
        .end()
        .map_err(|e| mismatch(String::new(), e.to_string()))?;

    Ok(value)
}

/// Reads and parses the document under `key`.
///
/// Read and parse failures are logged and reported as [`Hydrated::Discarded`]; this never
/// returns an error because a broken store must not stop the application from starting.
pub fn load_json<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &StorageKey) -> Hydrated<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Hydrated::Missing,
        Err(e) => {
            tracing::warn!("failed to read store '{}': {}", key, e);
            return Hydrated::Discarded;
        }
    };

    match parse_json(key, &raw) {
        Ok(value) => Hydrated::Loaded(value),
        Err(e) => {
            tracing::warn!("discarding persisted store: {}", e);
            Hydrated::Discarded
        }
    }
}

/// Serializes `value` and writes it under `key`, replacing whatever was there.
pub fn persist_json<T: Serialize + ?Sized>(
    storage: &dyn LocalStorage,
    key: &StorageKey,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    storage.set_item(key, &raw)
}

/// Storage doubles shared by the store tests.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory storage whose reads or writes can be switched to fail.
    #[derive(Debug, Default)]
    pub(crate) struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl FlakyStorage {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        pub(crate) fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    fn refused(op: &str) -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, format!("{op} refused"))
    }

    impl LocalStorage for FlakyStorage {
        fn get_item(&self, key: &StorageKey) -> StoreResult<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::FileRead(refused("read")));
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &StorageKey, value: &str) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::FileWrite(refused("write")));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &StorageKey) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::FileRemove(refused("remove")));
            }
            self.inner.remove_item(key)
        }

        fn keys(&self) -> StoreResult<Vec<StorageKey>> {
            self.inner.keys()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FlakyStorage;
    use super::*;
    use tempfile::TempDir;

    fn key(name: &str) -> StorageKey {
        StorageKey::new(name).unwrap()
    }

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        let articles = key("articles");

        assert_eq!(storage.get_item(&articles).unwrap(), None);
        storage.set_item(&articles, "[]").unwrap();
        assert_eq!(storage.get_item(&articles).unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.keys().unwrap(), vec![articles.clone()]);

        storage.remove_item(&articles).unwrap();
        storage.remove_item(&articles).unwrap();
        assert_eq!(storage.get_item(&articles).unwrap(), None);
    }

    #[test]
    fn test_file_storage_creates_directory_and_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("nested").join("data");
        let storage = FileStorage::open(&dir).expect("open should succeed");

        assert!(dir.is_dir(), "data directory should be created");

        let profile = key("userProfile");
        storage.set_item(&profile, "{\"id\":\"1\"}").unwrap();

        let file = dir.join("userProfile.json");
        assert!(file.is_file(), "store file should exist");
        assert!(
            !dir.join("userProfile.json.tmp").exists(),
            "staging file should be renamed away"
        );
        assert_eq!(
            storage.get_item(&profile).unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::open(temp_dir.path()).unwrap();

        assert_eq!(storage.get_item(&key("appointments")).unwrap(), None);
        storage
            .remove_item(&key("appointments"))
            .expect("removing an absent key should succeed");
    }

    #[test]
    fn test_file_storage_keys_skip_foreign_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::open(temp_dir.path()).unwrap();
        storage.set_item(&key("articles"), "[]").unwrap();
        storage.set_item(&key("appointments"), "[]").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(temp_dir.path().join(".hidden.json"), "{}").unwrap();

        assert_eq!(
            storage.keys().unwrap(),
            vec![key("appointments"), key("articles")]
        );
    }

    #[test]
    fn test_file_storage_rejects_file_as_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("plain");
        fs::write(&file, "x").unwrap();

        let err = FileStorage::open(&file).expect_err("open should fail on a file");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_json_reports_failing_path() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Entry {
            id: String,
            count: u32,
        }

        let err = parse_json::<Vec<Entry>>(
            &key("entries"),
            r#"[{"id":"a","count":1},{"id":"b","count":"many"}]"#,
        )
        .expect_err("should fail on the second entry");

        match err {
            StoreError::Deserialization { key, path, .. } => {
                assert_eq!(key, "entries");
                assert_eq!(path, "[1].count");
            }
            other => panic!("expected Deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_json_rejects_trailing_garbage() {
        assert!(parse_json::<Vec<u32>>(&key("numbers"), "[1,2] trailing").is_err());
        assert_eq!(
            parse_json::<Vec<u32>>(&key("numbers"), " [1,2] \n").unwrap(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_load_json_distinguishes_missing_and_discarded() {
        let storage = MemoryStorage::new();
        let numbers = key("numbers");

        assert_eq!(load_json::<Vec<u32>>(&storage, &numbers), Hydrated::Missing);

        storage.set_item(&numbers, "{not json").unwrap();
        assert_eq!(load_json::<Vec<u32>>(&storage, &numbers), Hydrated::Discarded);

        persist_json(&storage, &numbers, &vec![3u32, 4]).unwrap();
        assert_eq!(
            load_json::<Vec<u32>>(&storage, &numbers),
            Hydrated::Loaded(vec![3, 4])
        );
    }

    #[test]
    fn test_load_json_discards_on_read_failure() {
        let storage = FlakyStorage::new();
        let numbers = key("numbers");
        persist_json(&storage, &numbers, &vec![1u32]).unwrap();

        storage.fail_reads(true);
        assert_eq!(load_json::<Vec<u32>>(&storage, &numbers), Hydrated::Discarded);

        storage.fail_reads(false);
        assert_eq!(
            load_json::<Vec<u32>>(&storage, &numbers),
            Hydrated::Loaded(vec![1])
        );
    }
}
