// Whole-blob JSON persistence, the localStorage contract on disk

use crate::adapter::{Mutation, PersistenceAdapter};
use crate::error::StoreError;
use crate::models::QuoteRecord;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores the whole collection as one JSON array in a single file.
///
/// The blob is read wholesale on load and rewritten wholesale on every
/// mutation, the same contract the original kept with its single storage
/// key. O(n) per write.
pub struct LocalStorageAdapter {
    path: PathBuf,
}

impl LocalStorageAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_blob(&self, records: &[QuoteRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        // Acquire exclusive lock before writing
        file.lock_exclusive()?;

        let json = serde_json::to_string(records)
            .map_err(|e| StoreError::Persistence(format!("failed to encode quotes: {}", e)))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        debug!(path = ?self.path, count = records.len(), "rewrote quote blob");
        Ok(())
    }
}

impl PersistenceAdapter for LocalStorageAdapter {
    fn load(&mut self) -> Result<Vec<QuoteRecord>, StoreError> {
        if !self.path.exists() {
            // Nothing stored yet, start empty
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<QuoteRecord> = serde_json::from_str(&data)
            .map_err(|e| StoreError::Persistence(format!("failed to decode quotes: {}", e)))?;

        info!(path = ?self.path, count = records.len(), "loaded quotes from blob");
        Ok(records)
    }

    fn save(
        &mut self,
        _mutation: Mutation<'_>,
        all: &[QuoteRecord],
    ) -> Result<Vec<QuoteRecord>, StoreError> {
        self.write_blob(all)?;
        Ok(all.to_vec())
    }
}
