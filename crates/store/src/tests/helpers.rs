use std::path::{Path, PathBuf};

use datafile::{DataFile, FieldSchema, Header, DEFAULT_MAGIC};
use tempfile::TempDir;

use lockmgr::LockManager;
use parking_lot::Mutex;

use crate::Store;

/// Creates an empty data file with schema `{name:8, city:8}`.
pub fn people_file(dir: &Path) -> PathBuf {
    let path = dir.join("people.db");
    let header = Header::new(
        DEFAULT_MAGIC,
        vec![FieldSchema::new("name", 8), FieldSchema::new("city", 8)],
    );
    DataFile::create(&path, &header).unwrap().close().unwrap();
    path
}

/// A `{name:8, city:8}` store keyed on `name`.
pub fn people_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let path = people_file(dir.path());
    let store = Store::open(&path, vec![0]).unwrap();
    (dir, store)
}

/// Shorthand for a fully populated row.
pub fn row(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

/// Trims every field of a `read` result.
pub fn trimmed(fields: Vec<String>) -> Vec<String> {
    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

/// A store over `path` that skips the checks `Store::open` performs, for
/// paths `open` would refuse.
pub fn unchecked_store(path: impl Into<PathBuf>) -> Store {
    Store {
        path: path.into(),
        key_fields: Vec::new(),
        locks: LockManager::new(),
        append: Mutex::new(()),
        lock_timeout: None,
    }
}
