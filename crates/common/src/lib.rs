//! MotorTest Common Library
//!
//! Domain types and form logic for electric motor acceptance test reports:
//! the protocol field tree, catalog mirrors, selection pickers and the report
//! assembler, plus the in-memory store the reference backend serves.

pub mod api;
pub mod catalog;
pub mod error;
pub mod fields;
pub mod report;
pub mod search;
pub mod seed;
pub mod selector;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::{CatalogApi, ReportApi};
pub use catalog::{CatalogManager, EditMode};
pub use error::{Error, Result};
pub use fields::{FieldKey, GroupField, LeafField, ProtocolField, ProtocolFieldTree};
pub use report::{ReportForm, RetrievalTicket};
pub use search::{SearchPicker, Searchable};
pub use selector::TemplateSelection;
pub use store::MemoryStore;
pub use types::*;

/// MotorTest version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base URL of the backend API
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

/// Default directory for client configuration
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".motortest")
}

/// Default client configuration file
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
