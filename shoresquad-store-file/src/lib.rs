//! Key-value store that keeps one JSON file per key inside a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use shoresquad_core::ports::{KeyValueStore, PortError};

const EXTENSION: &str = "json";

/// Directory-backed [`KeyValueStore`].
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` for storage, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Io`] when the directory cannot be created.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, PortError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PortError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return Err(PortError::Internal(format!("invalid store key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), PortError> {
        let path = self.path_for(key)?;
        // Readers only ever see a complete collection.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&self) -> Result<(), PortError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (_dir, store) = store();
        assert!(store.read("shorequad_participations").unwrap().is_none());
    }

    #[test]
    fn write_then_read_and_survive_reopen() {
        let (dir, store) = store();
        store.write("shorequad_crew_members", b"[]").unwrap();
        store.write("shorequad_crew_members", b"[{\"id\":1}]").unwrap();

        let reopened = FileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(
            reopened.read("shorequad_crew_members").unwrap().as_deref(),
            Some(&b"[{\"id\":1}]"[..])
        );
        assert!(store.dir().join("shorequad_crew_members.json").exists());
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, store) = store();
        store.write("k", b"1").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.read("k").unwrap().is_none());
    }

    #[test]
    fn clear_only_touches_store_files() {
        let (_dir, store) = store();
        store.write("a", b"1").unwrap();
        store.write("b", b"2").unwrap();
        fs::write(store.dir().join("notes.txt"), b"keep me").unwrap();

        store.clear().unwrap();

        assert!(store.read("a").unwrap().is_none());
        assert!(store.read("b").unwrap().is_none());
        assert!(store.dir().join("notes.txt").exists());
    }

    #[test]
    fn path_traversal_keys_are_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.write("../escape", b"x"),
            Err(PortError::Internal(_))
        ));
        assert!(store.read("").is_err());
    }
}
