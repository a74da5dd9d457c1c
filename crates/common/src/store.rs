//! In-memory backend store
//!
//! Holds both catalogs, the protocol field sources and submitted reports.
//! The web server shares one store behind an `Arc`; each collection has its
//! own lock so tool and motor traffic never contend.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::api::{CatalogApi, ReportApi};
use crate::error::{Error, Result};
use crate::fields::ProtocolField;
use crate::seed::{self, FieldSource};
use crate::types::{CatalogRecord, Motor, NamedOption, RecordId, StoredReport, TestReport, Tool};

/// One catalog plus its id counter
#[derive(Debug)]
pub struct Collection<R> {
    records: Vec<R>,
    next_id: RecordId,
}

impl<R: CatalogRecord> Collection<R> {
    pub fn new(records: Vec<R>) -> Self {
        let next_id = records.iter().map(R::id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    fn insert(&mut self, draft: R::Draft) -> R {
        let record = R::from_draft(self.next_id, draft);
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }

    fn replace(&mut self, id: RecordId, record: R) -> Result<R> {
        if record.id() != id {
            return Err(Error::InvalidRequest(format!(
                "{} id {} does not match path id {}",
                R::KIND,
                record.id(),
                id
            )));
        }
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(R::KIND, id))?;
        *slot = record.clone();
        Ok(record)
    }

    fn remove(&mut self, id: RecordId) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        if self.records.len() == before {
            return Err(Error::not_found(R::KIND, id));
        }
        Ok(())
    }
}

/// Maps a record type to its collection in the store
pub trait Stored: CatalogRecord {
    fn collection(store: &MemoryStore) -> &RwLock<Collection<Self>>;
}

impl Stored for Tool {
    fn collection(store: &MemoryStore) -> &RwLock<Collection<Self>> {
        &store.tools
    }
}

impl Stored for Motor {
    fn collection(store: &MemoryStore) -> &RwLock<Collection<Self>> {
        &store.motors
    }
}

/// Backend state
pub struct MemoryStore {
    tools: RwLock<Collection<Tool>>,
    motors: RwLock<Collection<Motor>>,
    templates: Vec<FieldSource>,
    motor_types: Vec<FieldSource>,
    reports: RwLock<Vec<StoredReport>>,
}

impl MemoryStore {
    /// Store with empty catalogs; templates and motor types are always present
    pub fn empty() -> Self {
        Self::with_catalogs(Vec::new(), Vec::new())
    }

    /// Store preloaded with the reference catalogs
    pub fn seeded() -> Self {
        Self::with_catalogs(seed::tools(), seed::motors())
    }

    pub fn with_catalogs(tools: Vec<Tool>, motors: Vec<Motor>) -> Self {
        info!(tools = tools.len(), motors = motors.len(), "Initializing store");
        Self {
            tools: RwLock::new(Collection::new(tools)),
            motors: RwLock::new(Collection::new(motors)),
            templates: seed::templates(),
            motor_types: seed::motor_types(),
            reports: RwLock::new(Vec::new()),
        }
    }

    pub fn list<R: Stored>(&self) -> Vec<R> {
        R::collection(self).read().records.clone()
    }

    pub fn insert<R: Stored>(&self, draft: R::Draft) -> R {
        let record = R::collection(self).write().insert(draft);
        debug!("Created {} {}", R::KIND, record.id());
        record
    }

    pub fn replace<R: Stored>(&self, id: RecordId, record: R) -> Result<R> {
        let record = R::collection(self).write().replace(id, record)?;
        debug!("Updated {} {}", R::KIND, id);
        Ok(record)
    }

    pub fn remove<R: Stored>(&self, id: RecordId) -> Result<()> {
        R::collection(self).write().remove(id)?;
        debug!("Deleted {} {}", R::KIND, id);
        Ok(())
    }

    /// Templates offered for selection, in seed order
    pub fn templates(&self) -> Vec<NamedOption> {
        self.templates.iter().map(|t| t.option.clone()).collect()
    }

    pub fn motor_types(&self) -> Vec<NamedOption> {
        self.motor_types.iter().map(|t| t.option.clone()).collect()
    }

    /// Template fields followed by the motor type's extra fields
    pub fn protocol_fields(&self, template_id: &str, motor_type_id: &str) -> Result<Vec<ProtocolField>> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id() == template_id)
            .ok_or_else(|| Error::not_found("template", template_id))?;
        let motor_type = self
            .motor_types
            .iter()
            .find(|t| t.id() == motor_type_id)
            .ok_or_else(|| Error::not_found("motor type", motor_type_id))?;

        Ok(template
            .fields
            .iter()
            .chain(motor_type.fields.iter())
            .cloned()
            .collect())
    }

    pub fn record_report(&self, report: TestReport) -> StoredReport {
        let stored = StoredReport::new(report);
        info!(
            report = %stored.id,
            motor = stored.report.motor.id,
            tools = stored.report.test_tools.len(),
            "Received test report"
        );
        self.reports.write().push(stored.clone());
        stored
    }

    pub fn reports(&self) -> Vec<StoredReport> {
        self.reports.read().clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl<R: Stored> CatalogApi<R> for MemoryStore {
    async fn list(&self) -> Result<Vec<R>> {
        Ok(MemoryStore::list::<R>(self))
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        Ok(self.insert::<R>(draft.clone()))
    }

    async fn update(&self, record: &R) -> Result<R> {
        self.replace(record.id(), record.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        self.remove::<R>(id)
    }
}

#[async_trait]
impl ReportApi for MemoryStore {
    async fn protocol_fields(&self, template_id: &str, motor_type_id: &str) -> Result<Vec<ProtocolField>> {
        MemoryStore::protocol_fields(self, template_id, motor_type_id)
    }

    async fn submit_report(&self, report: &TestReport) -> Result<()> {
        self.record_report(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewTool;

    #[test]
    fn test_insert_assigns_next_id() {
        let store = MemoryStore::seeded();
        let tool: Tool = store.insert(NewTool::new("Clamp Meter", "CM001", "Electrical"));
        assert_eq!(tool.id, 7);

        let again: Tool = store.insert(NewTool::new("Clamp Meter", "CM002", "Electrical"));
        assert_eq!(again.id, 8);
        assert_eq!(store.list::<Tool>().len(), 8);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::empty();
        let first: Tool = store.insert(NewTool::new("A", "1", ""));
        store.remove::<Tool>(first.id).unwrap();
        let second: Tool = store.insert(NewTool::new("B", "2", ""));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_replace_checks_ids() {
        let store = MemoryStore::seeded();
        let mut tool = store.list::<Tool>()[0].clone();
        tool.category = "Metrology".to_string();

        assert!(matches!(
            store.replace(tool.id + 1, tool.clone()),
            Err(Error::InvalidRequest(_))
        ));

        let mut ghost = tool.clone();
        ghost.id = 99;
        assert!(matches!(store.replace(99, ghost), Err(Error::NotFound { .. })));

        let updated = store.replace(tool.id, tool.clone()).unwrap();
        assert_eq!(updated.category, "Metrology");
        assert_eq!(store.list::<Tool>()[0], tool);
    }

    #[test]
    fn test_remove_unknown_id() {
        let store = MemoryStore::seeded();
        assert!(matches!(store.remove::<Motor>(42), Err(Error::NotFound { .. })));
        assert_eq!(store.list::<Motor>().len(), 6);
    }

    #[test]
    fn test_protocol_fields_concatenates_sources() {
        let store = MemoryStore::empty();
        let fields = store.protocol_fields("template1", "type2").unwrap();
        let names: Vec<&str> = fields.iter().map(ProtocolField::name).collect();

        assert_eq!(names.first(), Some(&"Visual Inspection"));
        assert_eq!(names.last(), Some(&"Field Current"));
        assert_eq!(fields.len(), 4 + 3);
    }

    #[test]
    fn test_protocol_fields_unknown_ids() {
        let store = MemoryStore::empty();
        assert!(matches!(
            store.protocol_fields("template9", "type1"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            store.protocol_fields("template1", "type9"),
            Err(Error::NotFound { .. })
        ));
    }
}
