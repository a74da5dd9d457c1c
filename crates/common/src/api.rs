//! Backend seams
//!
//! Form state never talks HTTP directly; it calls these traits. The CLI
//! implements them over `reqwest`, tests implement them in memory.

use async_trait::async_trait;

use crate::error::Result;
use crate::fields::ProtocolField;
use crate::types::{CatalogRecord, RecordId, TestReport};

/// CRUD surface of one reference catalog
#[async_trait]
pub trait CatalogApi<R: CatalogRecord>: Send + Sync {
    /// `GET /{collection}`
    async fn list(&self) -> Result<Vec<R>>;

    /// `POST /{collection}`; the backend assigns the id
    async fn create(&self, draft: &R::Draft) -> Result<R>;

    /// `PUT /{collection}/{id}`
    async fn update(&self, record: &R) -> Result<R>;

    /// `DELETE /{collection}/{id}`
    async fn delete(&self, id: RecordId) -> Result<()>;
}

/// Field-set retrieval and report submission
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// `GET /protocol-fields?templateId=&motorTypeId=`
    async fn protocol_fields(&self, template_id: &str, motor_type_id: &str) -> Result<Vec<ProtocolField>>;

    /// `POST /test-reports`
    async fn submit_report(&self, report: &TestReport) -> Result<()>;
}
