//! In-memory progress store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use phonodrill_core::error::StoreError;
use phonodrill_core::progress::ProgressRecord;
use phonodrill_core::traits::{ProgressStore, VersionedRecord};

/// Progress store backed by a process-local map.
///
/// The versioned write contract is identical to the durable stores, so
/// engine tests against this store exercise the same conflict paths.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(Uuid, String), VersionedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, across all users.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Versioned upsert shared by the store backends.
pub(crate) fn apply_versioned_put(
    records: &mut HashMap<(Uuid, String), VersionedRecord>,
    record: ProgressRecord,
    expected_version: Option<u64>,
) -> Result<VersionedRecord, StoreError> {
    let key = (record.user_id, record.word_id.clone());
    let current = records.get(&key).map(|v| v.version);

    match (current, expected_version) {
        (None, None) => {
            let stored = VersionedRecord { record, version: 1 };
            records.insert(key, stored.clone());
            Ok(stored)
        }
        (Some(stored_version), Some(expected)) if stored_version == expected => {
            let stored = VersionedRecord {
                record,
                version: stored_version + 1,
            };
            records.insert(key, stored.clone());
            Ok(stored)
        }
        _ => Err(StoreError::Conflict {
            user_id: key.0,
            word_id: key.1,
        }),
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
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
        apply_versioned_put(&mut records, record, expected_version)
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
