use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{Page, Record, RecordFields, RecordId, RecordPatch, RecordStore};
use crate::error::{AppError, Result};

/// An in-process record store for tests and demos.
///
/// Assigns numeric ids, counts requests per operation, and can be told to
/// fail every request with a given status or to delay each one.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    page_size: u32,
    lists: AtomicUsize,
    creates: AtomicUsize,
    deletes: AtomicUsize,
    updates: AtomicUsize,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<Record>,
    next_id: u64,
    failure: Option<u16>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            page_size: 10,
            ..Default::default()
        }
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            state.next_id = records
                .iter()
                .filter_map(|r| match r.id {
                    RecordId::Number(n) => Some(n),
                    RecordId::Text(_) => None,
                })
                .max()
                .unwrap_or(0);
            state.records = records;
        }
        store
    }

    /// Fail every request with this HTTP status until [`recover`](Self::recover).
    pub fn fail_with(&self, status: u16) {
        self.lock().failure = Some(status);
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = Some(latency);
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Remove a record behind the client's back, as another client would.
    pub fn remove_externally(&self, id: &RecordId) {
        self.lock().records.retain(|r| r.id != *id);
    }

    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> usize {
        self.list_count() + self.create_count() + self.delete_count() + self.update_count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the request, wait out any latency, then apply the failure switch.
    async fn begin(&self, operation: &'static str, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);

        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.lock().failure {
            Some(status) => Err(AppError::RequestFailed {
                operation,
                status: Some(status),
                message: format!("HTTP {status}"),
            }),
            None => Ok(()),
        }
    }

    fn not_found(operation: &'static str) -> AppError {
        AppError::RequestFailed {
            operation,
            status: Some(404),
            message: "HTTP 404 Not Found".into(),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_page(&self, page: u32) -> Result<Page> {
        self.begin("list", &self.lists).await?;
        let state = self.lock();
        let size = self.page_size.max(1) as usize;
        let start = (page.max(1) as usize - 1) * size;
        Ok(Page {
            records: state.records.iter().skip(start).take(size).cloned().collect(),
            total: state.records.len() as u64,
        })
    }

    async fn list_all(&self) -> Result<Vec<Record>> {
        self.begin("list", &self.lists).await?;
        Ok(self.lock().records.clone())
    }

    async fn create(&self, fields: &RecordFields) -> Result<Record> {
        self.begin("create", &self.creates).await?;
        let mut state = self.lock();
        state.next_id += 1;
        let record = Record {
            id: RecordId::Number(state.next_id),
            fields: fields.clone(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.begin("delete", &self.deletes).await?;
        let mut state = self.lock();
        let before = state.records.len();
        state.records.retain(|r| r.id.to_string() != id.to_string());
        if state.records.len() == before {
            return Err(Self::not_found("delete"));
        }
        Ok(())
    }

    async fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<Record> {
        self.begin("update", &self.updates).await?;
        let mut state = self.lock();
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id.to_string() == id.to_string())
            .ok_or_else(|| Self::not_found("update"))?;

        let fields = &mut record.fields;
        if let Some(v) = &patch.first_name {
            fields.first_name = v.clone();
        }
        if let Some(v) = &patch.last_name {
            fields.last_name = v.clone();
        }
        if let Some(v) = &patch.email {
            fields.email = v.clone();
        }
        if let Some(v) = &patch.phone {
            fields.phone = v.clone();
        }
        if patch.birth_date.is_some() {
            fields.birth_date = patch.birth_date;
        }
        for (key, value) in &patch.extra {
            fields.extra.insert(key.clone(), value.clone());
        }

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(first: &str) -> RecordFields {
        RecordFields {
            first_name: first.into(),
            last_name: "Li".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let store = MemoryStore::new();
        let a = store.create(&fields("Al")).await.unwrap();
        let b = store.create(&fields("Bo")).await.unwrap();
        assert_eq!(a.id, RecordId::Number(1));
        assert_eq!(b.id, RecordId::Number(2));
        assert_eq!(store.list_all().await.unwrap().len(), 2);
        assert_eq!(store.create_count(), 2);
        assert_eq!(store.list_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete(&RecordId::Number(5)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_pagination() {
        let store = MemoryStore::new();
        for i in 0..12 {
            store.create(&fields(&format!("P{i}"))).await.unwrap();
        }
        let second = store.list_page(2).await.unwrap();
        assert_eq!(second.total, 12);
        assert_eq!(second.records.len(), 2);
        assert_eq!(second.records[0].fields.first_name, "P10");
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = MemoryStore::new();
        let created = store.create(&fields("Al")).await.unwrap();
        let patch = RecordPatch {
            phone: Some("+4915112345678".into()),
            ..Default::default()
        };
        let updated = store.update(&created.id, &patch).await.unwrap();
        assert_eq!(updated.fields.phone, "+4915112345678");
        assert_eq!(updated.fields.first_name, "Al");
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let store = MemoryStore::new();
        store.fail_with(500);
        let err = store.list_all().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        store.recover();
        assert!(store.list_all().await.is_ok());
    }
}
