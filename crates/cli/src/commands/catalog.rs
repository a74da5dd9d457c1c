//! Shared catalog command plumbing
//!
//! Tools and motors go through the same `CatalogManager` and `SearchPicker`
//! flow; only their arguments and table columns differ.

use anyhow::{bail, Result};
use motortest_common::{CatalogManager, CatalogRecord, RecordId, SearchPicker, Searchable};
use serde::Serialize;

use crate::client::ApiClient;
use crate::output::{print_list, print_success, OutputFormat, TableDisplay};

const UNCATEGORIZED: &str = "(uncategorized)";

/// Mirror of one catalog, freshly loaded
pub async fn load<R: CatalogRecord>(client: &ApiClient) -> Result<CatalogManager<R>> {
    let mut manager = CatalogManager::new();
    manager.load(client).await?;
    Ok(manager)
}

/// Look up a record by `id:<n>`, by a bare id, or by search text.
///
/// A bare number that is not an id is searched like any other text, so an
/// all-digit serial number still resolves. Search text must match at least
/// one record; the first match wins.
pub fn resolve<R: Searchable>(records: &[R], needle: &str) -> Result<R> {
    let needle = needle.trim();
    let by_id = |id: RecordId| records.iter().find(|r| r.id() == id).cloned();

    if let Some(id) = needle.strip_prefix("id:") {
        let id: RecordId = id.trim().parse()?;
        return by_id(id).ok_or_else(|| anyhow::anyhow!("No {} with id {}", R::KIND, id));
    }
    if let Some(record) = needle.parse::<RecordId>().ok().and_then(by_id) {
        return Ok(record);
    }

    let mut picker = SearchPicker::new(records.to_vec());
    picker.set_query(needle);
    let matches = picker.visible_results().len();
    if matches > 1 {
        tracing::warn!("'{}' matches {} {}s; using the first", needle, matches, R::KIND);
    }
    match picker.select_result(0) {
        Some(record) => Ok(record),
        None => bail!("No {} matches '{}'", R::KIND, needle),
    }
}

pub async fn list<R>(client: &ApiClient, format: OutputFormat) -> Result<()>
where
    R: CatalogRecord + TableDisplay,
{
    let manager = load::<R>(client).await?;
    print_list(manager.records(), format);
    Ok(())
}

pub async fn delete<R: CatalogRecord>(client: &ApiClient, id: RecordId) -> Result<()> {
    let mut manager = CatalogManager::<R>::new();
    manager.delete(client, id).await?;
    print_success(&format!("Deleted {} {}", R::KIND, id));
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryName {
    pub category: String,
}

impl TableDisplay for CategoryName {
    fn headers() -> Vec<&'static str> {
        vec!["Category"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.category.clone()]
    }
}

/// Category suggestions offered when adding or editing a record
pub async fn categories<R: CatalogRecord>(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let manager = load::<R>(client).await?;
    let names: Vec<CategoryName> = manager
        .categories()
        .iter()
        .map(|c| CategoryName { category: c.clone() })
        .collect();
    print_list(&names, format);
    Ok(())
}

pub async fn search<R>(client: &ApiClient, query: &str, format: OutputFormat) -> Result<()>
where
    R: Searchable + TableDisplay,
{
    let manager = load::<R>(client).await?;
    let mut picker = SearchPicker::new(manager.records().to_vec());
    picker.set_query(query);

    let results: Vec<R> = picker.visible_results().into_iter().cloned().collect();
    print_list(&results, format);
    Ok(())
}

/// One category in the browse view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub count: usize,
    /// Labels of the members; empty while the category is collapsed
    pub members: Vec<String>,
}

impl TableDisplay for CategoryRow {
    fn headers() -> Vec<&'static str> {
        vec!["Category", "Count", "Members"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.count.to_string(),
            self.members.join("\n"),
        ]
    }
}

/// Browse view rows; every category is expanded unless `only` names one
pub fn browse_rows<R: Searchable>(records: Vec<R>, only: Option<&str>) -> Vec<CategoryRow> {
    let mut picker = SearchPicker::new(records);
    picker.toggle_browse();

    let categories: Vec<String> = picker.grouped().keys().map(|c| c.to_string()).collect();
    for category in &categories {
        if only.map_or(true, |wanted| wanted == category) {
            picker.toggle_category(category);
        }
    }

    picker
        .grouped()
        .into_iter()
        .map(|(category, members)| CategoryRow {
            category: if category.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                category.to_string()
            },
            count: members.len(),
            members: if picker.is_expanded(category) {
                members.iter().map(|r| r.label()).collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}

pub async fn browse<R: Searchable>(client: &ApiClient, category: Option<&str>, format: OutputFormat) -> Result<()> {
    let manager = load::<R>(client).await?;
    let rows = browse_rows(manager.records().to_vec(), category);
    print_list(&rows, format);
    Ok(())
}
