//! Catalog manager
//!
//! Client-side mirror of one reference catalog. The mirror only changes after
//! the backend confirms an operation; a failed call is logged, returned, and
//! leaves the list, the category suggestions and the editor as they were.

use tracing::{debug, error};

use crate::api::CatalogApi;
use crate::error::Result;
use crate::types::{CatalogRecord, RecordId};

/// Whether submitting the editor creates or updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Add,
    Update,
}

/// Mirror of one catalog plus its editor state
#[derive(Debug, Clone)]
pub struct CatalogManager<R: CatalogRecord> {
    records: Vec<R>,
    categories: Vec<String>,
    draft: R::Draft,
    editing: Option<R>,
}

impl<R: CatalogRecord> Default for CatalogManager<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            categories: Vec::new(),
            draft: R::Draft::default(),
            editing: None,
        }
    }
}

impl<R: CatalogRecord> CatalogManager<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Category suggestions: distinct non-empty categories seen so far.
    ///
    /// Append-only until the next `load`; deleting or re-categorizing the
    /// last record of a category does not remove it.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Replace the mirror with the backend's list
    pub async fn load(&mut self, api: &impl CatalogApi<R>) -> Result<()> {
        let records = api.list().await.map_err(|e| {
            error!("Failed to fetch {}s: {}", R::KIND, e);
            e
        })?;

        self.categories.clear();
        for record in &records {
            note_category(&mut self.categories, record.category());
        }
        debug!("Loaded {} {}s", records.len(), R::KIND);
        self.records = records;
        Ok(())
    }

    pub async fn create(&mut self, api: &impl CatalogApi<R>, draft: &R::Draft) -> Result<R> {
        let created = api.create(draft).await.map_err(|e| {
            error!("Failed to add {}: {}", R::KIND, e);
            e
        })?;

        self.records.push(created.clone());
        note_category(&mut self.categories, created.category());
        debug!("Added {} {}", R::KIND, created.id());
        Ok(created)
    }

    pub async fn update(&mut self, api: &impl CatalogApi<R>, record: &R) -> Result<R> {
        let updated = api.update(record).await.map_err(|e| {
            error!("Failed to update {} {}: {}", R::KIND, record.id(), e);
            e
        })?;

        for slot in self.records.iter_mut().filter(|r| r.id() == updated.id()) {
            *slot = updated.clone();
        }
        note_category(&mut self.categories, updated.category());
        debug!("Updated {} {}", R::KIND, updated.id());
        Ok(updated)
    }

    pub async fn delete(&mut self, api: &impl CatalogApi<R>, id: RecordId) -> Result<()> {
        api.delete(id).await.map_err(|e| {
            error!("Failed to delete {} {}: {}", R::KIND, id, e);
            e
        })?;

        self.records.retain(|r| r.id() != id);
        debug!("Deleted {} {}", R::KIND, id);
        Ok(())
    }

    // Editor

    pub fn mode(&self) -> EditMode {
        if self.editing.is_some() {
            EditMode::Update
        } else {
            EditMode::Add
        }
    }

    /// Select a record for editing; returns false for an unknown id.
    pub fn begin_edit(&mut self, id: RecordId) -> bool {
        match self.get(id).cloned() {
            Some(record) => {
                self.editing = Some(record);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&R> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut R> {
        self.editing.as_mut()
    }

    /// Create from the draft or update the selected record, depending on mode
    pub async fn submit_editor(&mut self, api: &impl CatalogApi<R>) -> Result<Option<R>> {
        match self.mode() {
            EditMode::Add => {
                let draft = self.draft.clone();
                let created = self.create(api, &draft).await?;
                self.draft = R::Draft::default();
                Ok(Some(created))
            }
            EditMode::Update => self.update_selected(api).await,
        }
    }

    /// Push the record being edited; a no-op when nothing is selected
    pub async fn update_selected(&mut self, api: &impl CatalogApi<R>) -> Result<Option<R>> {
        let Some(record) = self.editing.clone() else {
            return Ok(None);
        };
        let updated = self.update(api, &record).await?;
        self.editing = None;
        Ok(Some(updated))
    }
}

fn note_category(categories: &mut Vec<String>, category: &str) {
    if !category.is_empty() && !categories.iter().any(|c| c == category) {
        categories.push(category.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::FakeBackend;
    use crate::types::{Motor, NewTool, Tool};

    async fn loaded_tools(backend: &FakeBackend) -> CatalogManager<Tool> {
        let mut manager = CatalogManager::new();
        manager.load(backend).await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_load_derives_categories() {
        let backend = FakeBackend::seeded();
        let manager = loaded_tools(&backend).await;

        assert_eq!(manager.records().len(), 6);
        assert_eq!(manager.categories(), ["Electrical", "Mechanical", "Thermal"]);
    }

    #[tokio::test]
    async fn test_create_appends_server_record() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;
        let before = manager.records().len();

        let created = manager
            .create(&backend, &NewTool::new("Multimeter2", "MM099", "Electrical"))
            .await
            .unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(manager.records().len(), before + 1);
        assert_eq!(manager.records().last(), Some(&created));
        assert_eq!(manager.categories().len(), 3);
    }

    #[tokio::test]
    async fn test_new_category_appears_once() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;

        manager
            .create(&backend, &NewTool::new("Pressure Gauge", "PG001", "Hydraulic"))
            .await
            .unwrap();
        manager
            .create(&backend, &NewTool::new("Flow Meter", "FM001", "Hydraulic"))
            .await
            .unwrap();

        let hydraulic = manager.categories().iter().filter(|c| *c == "Hydraulic").count();
        assert_eq!(hydraulic, 1);
    }

    #[tokio::test]
    async fn test_empty_category_not_suggested() {
        let backend = FakeBackend::empty();
        let mut manager: CatalogManager<Tool> = CatalogManager::new();

        manager.create(&backend, &NewTool::new("Tape", "T1", "")).await.unwrap();
        assert!(manager.categories().is_empty());
    }

    #[tokio::test]
    async fn test_delete_preserves_order() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;

        manager.delete(&backend, 3).await.unwrap();

        let ids: Vec<_> = manager.records().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_categories_never_pruned() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;

        manager.delete(&backend, 6).await.unwrap();
        assert!(manager.categories().iter().any(|c| c == "Thermal"));
    }

    #[tokio::test]
    async fn test_update_replaces_matching_entry() {
        let backend = FakeBackend::seeded();
        let mut manager: CatalogManager<Motor> = CatalogManager::new();
        manager.load(&backend).await.unwrap();

        let mut motor = manager.get(4).cloned().unwrap();
        motor.voltage = 36.0;
        motor.category = "Brushless DC".to_string();
        manager.update(&backend, &motor).await.unwrap();

        assert_eq!(manager.get(4), Some(&motor));
        assert_eq!(manager.records()[3], motor);
        assert_eq!(manager.categories().last().map(String::as_str), Some("Brushless DC"));
    }

    #[tokio::test]
    async fn test_failure_leaves_state_untouched() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;
        let records = manager.records().to_vec();
        let categories = manager.categories().to_vec();

        backend.fail_next(503, "Service Unavailable");
        let err = manager
            .create(&backend, &NewTool::new("Megger", "MG001", "Insulation"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http { status: 503, .. }));

        backend.fail_next(500, "Internal Server Error");
        assert!(manager.delete(&backend, 1).await.is_err());

        backend.fail_next(500, "Internal Server Error");
        assert!(manager.load(&backend).await.is_err());

        assert_eq!(manager.records(), records.as_slice());
        assert_eq!(manager.categories(), categories.as_slice());
    }

    #[tokio::test]
    async fn test_editor_add_mode_resets_draft() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;
        assert_eq!(manager.mode(), EditMode::Add);

        *manager.draft_mut() = NewTool::new("Tachometer", "TA001", "Mechanical");
        let created = manager.submit_editor(&backend).await.unwrap().unwrap();

        assert_eq!(created.name, "Tachometer");
        assert_eq!(manager.draft(), &NewTool::default());
        assert_eq!(manager.records().len(), 7);
    }

    #[tokio::test]
    async fn test_editor_update_mode() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;

        assert!(manager.begin_edit(2));
        assert_eq!(manager.mode(), EditMode::Update);
        if let Some(tool) = manager.editing_mut() {
            tool.serial_number = "OS002".to_string();
        }

        let updated = manager.submit_editor(&backend).await.unwrap().unwrap();
        assert_eq!(updated.serial_number, "OS002");
        assert_eq!(manager.mode(), EditMode::Add);
        assert_eq!(manager.records().len(), 6);
    }

    #[tokio::test]
    async fn test_cancel_edit_discards_changes() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;
        let before = manager.get(4).cloned();

        assert!(manager.begin_edit(4));
        if let Some(tool) = manager.editing_mut() {
            tool.name = "Impact Wrench".to_string();
        }
        manager.cancel_edit();

        assert_eq!(manager.mode(), EditMode::Add);
        assert!(manager.editing().is_none());
        assert_eq!(manager.get(4).cloned(), before);
    }

    #[tokio::test]
    async fn test_update_without_selection_is_noop() {
        let backend = FakeBackend::seeded();
        let mut manager = loaded_tools(&backend).await;
        let calls = backend.calls();

        assert!(!manager.begin_edit(99));
        assert_eq!(manager.update_selected(&backend).await.unwrap(), None);
        assert_eq!(backend.calls(), calls);
    }
}
