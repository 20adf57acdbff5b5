pub mod http;
pub mod memory;
pub mod models;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpRecordStore;
pub use memory::MemoryStore;
pub use models::{Record, RecordFields, RecordId, RecordPatch};

/// One page of records plus the collection's total size.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub total: u64,
}

/// Create/read/update/delete against a remote JSON collection of records.
///
/// Every operation fails with `RequestFailed` on a non-success response and
/// with `MalformedResponse` when the body is not the expected JSON. Nothing is
/// retried.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_page(&self, page: u32) -> Result<Page>;
    async fn list_all(&self) -> Result<Vec<Record>>;
    async fn create(&self, fields: &RecordFields) -> Result<Record>;
    async fn delete(&self, id: &RecordId) -> Result<()>;
    async fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<Record>;
}
