//! Filesystem page sink
//!
//! Each key is a file directly under the sink root. Bodies are written to a
//! temporary sibling file and renamed into place.

use crate::storage::{PageSink, PersistenceError, PersistenceResult, StorageKey};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Page sink backed by a directory on the local filesystem
#[derive(Debug)]
pub struct FsSink {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FsSink {
    /// Creates a sink rooted at `root`
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Returns the path a key is stored at
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Temporary sibling for one write
    ///
    /// The name does not contain the key, so it stays short even when the key
    /// is at the file name length limit.
    fn temp_path(&self) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(".tmp-{}-{}", std::process::id(), n))
    }
}

fn validate_key(key: &StorageKey) -> PersistenceResult<()> {
    let name = key.as_str();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".."
    {
        return Err(PersistenceError::InvalidKey(name.to_string()));
    }
    Ok(())
}

impl PageSink for FsSink {
    fn write(&self, key: &StorageKey, body: &[u8]) -> PersistenceResult<()> {
        validate_key(key)?;

        let io_err = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(io_err)?;

        let tmp_path = self.temp_path();
        let result = (|| {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(body)?;
            file.sync_all()?;
            fs::rename(&tmp_path, self.path_for(key))
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(e));
        }

        tracing::trace!("Wrote {} bytes to {}", body.len(), self.path_for(key).display());
        Ok(())
    }
}
