//! File-backed key-value store
//!
//! Each key maps to one JSON document under the data directory. Writes go
//! through a temp file followed by an atomic rename, so a crash mid-write
//! leaves the previous document intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{KvStore, StorageResult};

/// Durable store keeping one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Resolve the data directory from `STATS_DATA_DIR`, defaulting to `data`
    pub fn from_env() -> Self {
        let data_dir = std::env::var("STATS_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the document backing a key
    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are namespaced with ':', which is not portable in file names
        let name: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.data_dir.join(format!("{}.json", name))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.data_dir)?;

        let path = self.key_path(key);
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}
