use std::{path::PathBuf, sync::Mutex};

use crate::{
    models::assignment::Assignment,
    storage::{STORAGE_KEY, Storage, StorageError},
};

/// Single-key blob store used by tests in place of the data directory.
#[derive(Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: Mutex::new(Some(blob.to_string())),
            writes: Mutex::new(0),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Vec<Assignment>, StorageError> {
        match self.blob.lock().unwrap().as_deref() {
            Some(blob) => serde_json::from_str(blob).map_err(|e| StorageError::ParseFailed {
                path: PathBuf::from(STORAGE_KEY),
                source: e,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, assignments: &[Assignment]) -> Result<(), StorageError> {
        let json = serde_json::to_string(assignments)
            .map_err(|e| StorageError::SerializeFailed { source: e })?;
        *self.blob.lock().unwrap() = Some(json);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}
