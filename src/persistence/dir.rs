//! Directory-backed store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StoreError;

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys must stay inside the dir
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Temp file + rename: readers never see a partial record
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_store_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(tmp.path().join("saves")).unwrap();

        assert_eq!(store.get("math_asteroids_missed_facts").unwrap(), None);
        store.set("math_asteroids_missed_facts", "[]").unwrap();
        assert_eq!(
            store.get("math_asteroids_missed_facts").unwrap().as_deref(),
            Some("[]")
        );

        // Reopening sees the same data
        let reopened = DirStore::open(tmp.path().join("saves")).unwrap();
        assert!(reopened.get("math_asteroids_missed_facts").unwrap().is_some());
    }

    #[test]
    fn test_key_sanitized() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        let path = store.path_for("../evil");
        assert_eq!(path.parent(), Some(tmp.path()));
    }
}
