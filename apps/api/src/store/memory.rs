use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::models::stored::{to_row, ResumeRow, StoredResume};
use crate::store::{RecordStore, StoreError};

/// Process-local store. Rows go through the same encoding as the database so the
/// narrow-schema switch behaves identically.
pub struct InMemoryRecordStore {
    rows: RwLock<Vec<ResumeRow>>,
    persist_full_record: bool,
}

impl InMemoryRecordStore {
    pub fn new(persist_full_record: bool) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            persist_full_record,
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, record: &ResumeRecord, owner: Uuid) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let row = to_row(record, id, owner, Utc::now(), self.persist_full_record)?;
        self.rows.write().await.push(row);
        Ok(id)
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, StoreError> {
        let rows = self.rows.read().await;
        // Later inserts first, then a stable sort keeps that order for equal timestamps.
        let mut owned: Vec<ResumeRow> = rows
            .iter()
            .rev()
            .filter(|row| row.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned.into_iter().map(StoredResume::from_row).collect())
    }

    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id && row.user_id == owner)
            .cloned()
            .map(StoredResume::from_row)
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
