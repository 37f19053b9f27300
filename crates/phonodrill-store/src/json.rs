//! JSON file progress store.
//!
//! Keeps the full record set in memory behind a mutex and rewrites the
//! file after every successful put. Writes go through a sibling temp file
//! and an atomic rename so a crash mid-write never truncates existing
//! progress. Suited to single-process CLI use, not to contended
//! multi-process access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use phonodrill_core::error::StoreError;
use phonodrill_core::progress::ProgressRecord;
use phonodrill_core::traits::{ProgressStore, VersionedRecord};

use crate::memory::apply_versioned_put;

/// Progress store persisted as a JSON array of versioned records.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: Mutex<HashMap<(Uuid, String), VersionedRecord>>,
}

impl JsonStore {
    /// Open a store at `path`, loading existing records if the file
    /// exists. The parent directory is created as needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let records = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let loaded: Vec<VersionedRecord> = serde_json::from_str(&content)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
            debug!("loaded {} progress records from {}", loaded.len(), path.display());
            loaded
                .into_iter()
                .map(|v| ((v.record.user_id, v.record.word_id.clone()), v))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the backing file from the given snapshot.
    fn persist(&self, records: &HashMap<(Uuid, String), VersionedRecord>) -> Result<(), StoreError> {
        let mut snapshot: Vec<&VersionedRecord> = records.values().collect();
        snapshot.sort_by(|a, b| {
            (a.record.user_id, &a.record.word_id).cmp(&(b.record.user_id, &b.record.word_id))
        });

        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Corrupt(format!("failed to encode records: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for JsonStore {
    async fn get_progress(
        &self,
        user_id: Uuid,
        word_id: &str,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&(user_id, word_id.to_string())).cloned())
    }

    async fn put_progress(
        &self,
        record: ProgressRecord,
        expected_version: Option<u64>,
    ) -> Result<VersionedRecord, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let key = (record.user_id, record.word_id.clone());
        let previous = records.get(&key).cloned();

        let stored = apply_versioned_put(&mut records, record, expected_version)?;

        // The in-memory map must never get ahead of the file: undo the
        // upsert if the write fails.
        if let Err(e) = self.persist(&records) {
            match previous {
                Some(prev) => {
                    records.insert(key, prev);
                }
                None => {
                    records.remove(&key);
                }
            }
            return Err(e);
        }
        Ok(stored)
    }

    async fn list_progress(&self, user_id: Uuid) -> Result<Vec<ProgressRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut result: Vec<ProgressRecord> = records
            .values()
            .filter(|v| v.record.user_id == user_id)
            .map(|v| v.record.clone())
            .collect();
        result.sort_by(|a, b| a.word_id.cmp(&b.word_id));
        Ok(result)
    }
}
