// Record Store Adapter: persistence of submitted records, keyed by owner.
// `PgRecordStore` backs the service when a database is configured; `InMemoryRecordStore`
// otherwise and in tests. Both go through the same row mapping in `models::stored`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::models::stored::StoredResume;

pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode resume: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a frozen record for `owner`; identity and timestamp are assigned here.
    async fn create(&self, record: &ResumeRecord, owner: Uuid) -> Result<Uuid, StoreError>;

    /// The owner's records, newest first.
    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, StoreError>;

    /// One record, only if it belongs to `owner`.
    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
