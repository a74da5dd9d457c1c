//! Core types for MotorTest

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::fields::ProtocolField;

/// Backend-assigned record identifier
pub type RecordId = u64;

/// Behavior shared by the two reference catalogs.
///
/// A record always carries an id; the matching `Draft` type is the same
/// record without one and is what gets sent on create.
pub trait CatalogRecord:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Draft: Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Singular name used in logs and errors ("tool")
    const KIND: &'static str;

    /// Path segment under `/api` ("tools")
    const COLLECTION: &'static str;

    fn id(&self) -> RecordId;

    fn category(&self) -> &str;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    fn to_draft(&self) -> Self::Draft;
}

/// Test tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: RecordId,
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub category: String,
}

/// Test tool that has not been created yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTool {
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub category: String,
}

impl NewTool {
    pub fn new(name: impl Into<String>, serial_number: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serial_number: serial_number.into(),
            category: category.into(),
        }
    }
}

impl CatalogRecord for Tool {
    type Draft = NewTool;

    const KIND: &'static str = "tool";
    const COLLECTION: &'static str = "tools";

    fn id(&self) -> RecordId {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn from_draft(id: RecordId, draft: NewTool) -> Self {
        Self {
            id,
            name: draft.name,
            serial_number: draft.serial_number,
            category: draft.category,
        }
    }

    fn to_draft(&self) -> NewTool {
        NewTool {
            name: self.name.clone(),
            serial_number: self.serial_number.clone(),
            category: self.category.clone(),
        }
    }
}

/// Electric motor under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motor {
    pub id: RecordId,
    pub model: String,
    pub serial_number: String,
    /// Rated power in kW
    pub power: f64,
    /// Rated voltage in V
    pub voltage: f64,
    #[serde(default)]
    pub category: String,
}

/// Motor that has not been created yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMotor {
    pub model: String,
    pub serial_number: String,
    pub power: f64,
    pub voltage: f64,
    #[serde(default)]
    pub category: String,
}

impl CatalogRecord for Motor {
    type Draft = NewMotor;

    const KIND: &'static str = "motor";
    const COLLECTION: &'static str = "motors";

    fn id(&self) -> RecordId {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn from_draft(id: RecordId, draft: NewMotor) -> Self {
        Self {
            id,
            model: draft.model,
            serial_number: draft.serial_number,
            power: draft.power,
            voltage: draft.voltage,
            category: draft.category,
        }
    }

    fn to_draft(&self) -> NewMotor {
        NewMotor {
            model: self.model.clone(),
            serial_number: self.serial_number.clone(),
            power: self.power,
            voltage: self.voltage,
            category: self.category.clone(),
        }
    }
}

/// Submission payload, built once at submit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub protocol_fields: Vec<ProtocolField>,
    pub test_tools: Vec<Tool>,
    pub motor: Motor,
}

/// A report as kept by the backend after submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub report: TestReport,
}

impl StoredReport {
    pub fn new(report: TestReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            report,
        }
    }
}

/// Named entry of a fixed selection list (templates, motor types)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOption {
    pub id: String,
    pub name: String,
}
