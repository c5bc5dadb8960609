//! File-backed snapshot store

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{SnapshotError, SnapshotStore};

/// Snapshot store that keeps one cart per JSON file.
///
/// Writes go to a temporary sibling first and are renamed into place, so a crash mid-write
/// leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store snapshots at exactly `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the snapshot for `key` as `<dir>/<key>.json`.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError::InvalidKey`] unless `key` is non-empty and made of ASCII
    /// letters, digits, `-` and `_`.
    pub fn in_dir(dir: impl AsRef<Path>, key: &str) -> Result<Self, SnapshotError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(SnapshotError::InvalidKey(key.to_string()));
        }

        Ok(Self::new(dir.as_ref().join(format!("{key}.json"))))
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, bytes)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_loads_nothing() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::in_dir(dir.path(), "cart")?;

        assert_eq!(store.load()?, None);

        Ok(())
    }

    #[test]
    fn save_then_load_returns_bytes() -> TestResult {
        let dir = tempdir()?;
        let mut store = FileStore::in_dir(dir.path().join("nested"), "cart-1")?;

        store.save(b"[]")?;

        assert_eq!(store.load()?, Some(b"[]".to_vec()));
        assert!(
            store.path().ends_with("nested/cart-1.json"),
            "unexpected snapshot path {}",
            store.path().display()
        );

        Ok(())
    }

    #[test]
    fn save_leaves_no_staging_file() -> TestResult {
        let dir = tempdir()?;
        let mut store = FileStore::in_dir(dir.path(), "cart")?;

        store.save(b"[1]")?;
        store.save(b"[2]")?;

        let names: Vec<_> = fs::read_dir(dir.path())?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<_, _>>()?;

        assert_eq!(names, vec![std::ffi::OsString::from("cart.json")]);
        assert_eq!(store.load()?, Some(b"[2]".to_vec()));

        Ok(())
    }

    #[test]
    fn rejects_path_like_keys() {
        for key in ["", "../cart", "a/b", "cart.json"] {
            assert!(
                matches!(
                    FileStore::in_dir("/tmp", key),
                    Err(SnapshotError::InvalidKey(_))
                ),
                "key {key:?} should be rejected"
            );
        }
    }
}
