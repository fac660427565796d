use std::path::PathBuf;

use log::error;
use thiserror::Error;

use crate::models::assignment::Assignment;

pub mod json;
#[cfg(test)]
pub mod memory;

/// Key the assignment list is stored under.
pub const STORAGE_KEY: &str = "remind-assignments";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load assignments from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save assignments to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize assignments to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait Storage {
    /// Reads the persisted snapshot. A missing snapshot is an empty list.
    fn read(&self) -> Result<Vec<Assignment>, StorageError>;

    /// Replaces the persisted snapshot with `assignments`.
    fn save(&self, assignments: &[Assignment]) -> Result<(), StorageError>;

    /// Like [`Storage::read`], but a failure is logged and treated as "no data".
    fn load(&self) -> Vec<Assignment> {
        match self.read() {
            Ok(assignments) => assignments,
            Err(e) => {
                error!("Error loading assignments: {e}");
                Vec::new()
            }
        }
    }
}
