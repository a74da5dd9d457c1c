//! Selection widgets
//!
//! A `SearchPicker` finds one record in a reference collection either by a
//! case-insensitive substring query or by browsing the collection grouped
//! by category. Picking a record hands it back and resets the search.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::types::{CatalogRecord, Motor, Tool};

/// Records a picker can search
pub trait Searchable: CatalogRecord {
    /// `needle` is lowercase and non-blank
    fn matches(&self, needle: &str) -> bool;

    /// One-line description for result lists
    fn label(&self) -> String;
}

impl Searchable for Tool {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn label(&self) -> String {
        format!("{} - {}", self.name, self.serial_number)
    }
}

impl Searchable for Motor {
    fn matches(&self, needle: &str) -> bool {
        self.model.to_lowercase().contains(needle) || self.serial_number.to_lowercase().contains(needle)
    }

    fn label(&self) -> String {
        format!("{} - {}", self.model, self.serial_number)
    }
}

/// Records matching `query`; a blank query matches nothing.
pub fn filter<'a, R: Searchable>(records: &'a [R], query: &str) -> Vec<&'a R> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    records.iter().filter(|r| r.matches(&needle)).collect()
}

/// Category → members, both in source order
pub fn group_by_category<R: CatalogRecord>(records: &[R]) -> IndexMap<&str, Vec<&R>> {
    let mut groups: IndexMap<&str, Vec<&R>> = IndexMap::new();
    for record in records {
        groups.entry(record.category()).or_default().push(record);
    }
    groups
}

/// Search-and-browse picker state
#[derive(Debug, Clone)]
pub struct SearchPicker<R: Searchable> {
    reference: Vec<R>,
    query: String,
    results: Vec<usize>,
    show_results: bool,
    browsing: bool,
    expanded: HashSet<String>,
}

impl<R: Searchable> SearchPicker<R> {
    pub fn new(reference: Vec<R>) -> Self {
        Self {
            reference,
            query: String::new(),
            results: Vec::new(),
            show_results: false,
            browsing: false,
            expanded: HashSet::new(),
        }
    }

    pub fn reference(&self) -> &[R] {
        &self.reference
    }

    /// Swap the reference collection, re-running the current query
    pub fn set_reference(&mut self, reference: Vec<R>) {
        self.reference = reference;
        let query = std::mem::take(&mut self.query);
        self.set_query(query);
    }

    pub fn filter(&self, query: &str) -> Vec<&R> {
        filter(&self.reference, query)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.query.trim().is_empty() {
            self.results.clear();
            self.show_results = false;
            return;
        }

        let needle = self.query.to_lowercase();
        self.results = self
            .reference
            .iter()
            .enumerate()
            .filter(|(_, r)| r.matches(&needle))
            .map(|(i, _)| i)
            .collect();
        self.show_results = true;
    }

    /// Results to render; empty while hidden
    pub fn visible_results(&self) -> Vec<&R> {
        if !self.show_results {
            return Vec::new();
        }
        self.results.iter().map(|&i| &self.reference[i]).collect()
    }

    pub fn is_showing_results(&self) -> bool {
        self.show_results
    }

    /// Interaction outside the widget hides the result list
    pub fn dismiss(&mut self) {
        self.show_results = false;
    }

    /// Open or close the browse view; opening collapses every category
    pub fn toggle_browse(&mut self) {
        self.browsing = !self.browsing;
        if self.browsing {
            self.expanded.clear();
        }
    }

    pub fn is_browsing(&self) -> bool {
        self.browsing
    }

    pub fn grouped(&self) -> IndexMap<&str, Vec<&R>> {
        group_by_category(&self.reference)
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.expanded.remove(category) {
            self.expanded.insert(category.to_string());
        }
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.expanded.contains(category)
    }

    /// Hand back `record` and reset query, results and visibility
    pub fn select(&mut self, record: &R) -> R {
        self.query.clear();
        self.results.clear();
        self.show_results = false;
        record.clone()
    }

    /// Pick the `index`-th visible result
    pub fn select_result(&mut self, index: usize) -> Option<R> {
        let record = self.visible_results().get(index).map(|r| (*r).clone())?;
        Some(self.select(&record))
    }
}
