//! Snapshot persistence
//!
//! Saves and loads the whole note sequence as one JSON array. Writes go to a
//! temporary file first and are then renamed over the target, so a reader
//! never observes a partially-written snapshot.
//!
//! Default location: `notes_data.json` in the working directory
//! (configurable via `Config::snapshot_path`).

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::Note;

/// File-backed snapshot of the note sequence
#[derive(Debug, Clone)]
pub struct SnapshotPersistence {
    path: PathBuf,
}

impl SnapshotPersistence {
    /// Create a persistence handler for the given snapshot path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a persistence handler at the configured snapshot path
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.snapshot_path.clone())
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Overwrite the snapshot with `notes`
    pub fn save(&self, notes: &[Note]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(notes)?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = %self.path.display(), count = notes.len(), "Saved notes snapshot");
        Ok(())
    }

    /// Load the snapshot
    ///
    /// Returns `None` if the file doesn't exist.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self) -> StorageResult<Option<Vec<Note>>> {
        if !self.exists() {
            return Ok(None);
        }

        let bytes =
            fs::read(&self.path).map_err(|e| StorageError::from_read(e, self.path.clone()))?;

        let notes: Vec<Note> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
                path: self.path.clone(),
                details: e.to_string(),
            })?;

        debug!(path = %self.path.display(), count = notes.len(), "Loaded notes snapshot");
        Ok(Some(notes))
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_write(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_write(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_write(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
