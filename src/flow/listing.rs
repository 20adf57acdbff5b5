//! The read path: fetch everything, show it, re-fetch after every write.

use std::sync::Arc;

use crate::error::Result;
use crate::flow::RefreshTrigger;
use crate::store::{Record, RecordId, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Loading,
    Ready,
    Failed(String),
}

pub struct ListingFlow {
    store: Arc<dyn RecordStore>,
    refresh: RefreshTrigger,
    loaded_generation: Option<u64>,
    records: Vec<Record>,
    status: ListingStatus,
}

impl ListingFlow {
    /// A new listing starts out loading; call [`refresh`](Self::refresh) to
    /// fetch.
    pub fn new(store: Arc<dyn RecordStore>, refresh: RefreshTrigger) -> Self {
        Self {
            store,
            refresh,
            loaded_generation: None,
            records: Vec::new(),
            status: ListingStatus::Loading,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn status(&self) -> &ListingStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListingStatus::Loading
    }

    /// Fetch the full list. On failure the previous records stay in place,
    /// the status carries the error, and the next [`sync`](Self::sync)
    /// fetches again.
    pub async fn refresh(&mut self) -> Result<()> {
        self.status = ListingStatus::Loading;
        let generation = self.refresh.generation();

        match self.store.list_all().await {
            Ok(records) => {
                tracing::debug!("Loaded {} record(s)", records.len());
                self.records = records;
                self.status = ListingStatus::Ready;
                self.loaded_generation = Some(generation);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load records: {e}");
                self.status = ListingStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-fetch if a write happened since the last fetch. Returns whether a
    /// fetch was made.
    pub async fn sync(&mut self) -> Result<bool> {
        if self.loaded_generation == Some(self.refresh.generation()) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Delete a record and re-fetch the list from the store. The row is not
    /// removed locally; if the delete fails the list is left as it was.
    ///
    /// The result is the delete's. A failed re-fetch afterwards shows up in
    /// [`status`](Self::status).
    pub async fn delete(&mut self, id: &RecordId) -> Result<()> {
        if let Err(e) = self.store.delete(id).await {
            tracing::error!("Failed to delete record {id}: {e}");
            return Err(e);
        }
        tracing::info!("Record {id} deleted");
        self.refresh.bump();
        let _ = self.refresh().await;
        Ok(())
    }
}
