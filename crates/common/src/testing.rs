//! Test double for the backend traits: counts calls and injects failures.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{CatalogApi, ReportApi};
use crate::error::{Error, Result};
use crate::fields::ProtocolField;
use crate::store::{MemoryStore, Stored};
use crate::types::{RecordId, TestReport};

pub struct FakeBackend {
    pub store: MemoryStore,
    calls: AtomicUsize,
    failure: Mutex<Option<(u16, String)>>,
}

impl FakeBackend {
    pub fn seeded() -> Self {
        Self::wrap(MemoryStore::seeded())
    }

    pub fn empty() -> Self {
        Self::wrap(MemoryStore::empty())
    }

    fn wrap(store: MemoryStore) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    /// Number of backend calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next call fail with this HTTP status
    pub fn fail_next(&self, status: u16, status_text: &str) {
        *self.failure.lock() = Some((status, status_text.to_string()));
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().take() {
            Some((status, status_text)) => Err(Error::Http { status, status_text }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Stored> CatalogApi<R> for FakeBackend {
    async fn list(&self) -> Result<Vec<R>> {
        self.enter()?;
        Ok(self.store.list::<R>())
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.enter()?;
        Ok(self.store.insert::<R>(draft.clone()))
    }

    async fn update(&self, record: &R) -> Result<R> {
        self.enter()?;
        self.store.replace(record.id(), record.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        self.enter()?;
        self.store.remove::<R>(id)
    }
}

#[async_trait]
impl ReportApi for FakeBackend {
    async fn protocol_fields(&self, template_id: &str, motor_type_id: &str) -> Result<Vec<ProtocolField>> {
        self.enter()?;
        self.store.protocol_fields(template_id, motor_type_id)
    }

    async fn submit_report(&self, report: &TestReport) -> Result<()> {
        self.enter()?;
        self.store.record_report(report.clone());
        Ok(())
    }
}
