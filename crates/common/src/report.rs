//! Test report form and assembler
//!
//! `ReportForm` owns everything a report is built from: the template/type
//! selection, the editable protocol field tree, the selected tools and the
//! selected motor. Submitting snapshots that state into a `TestReport`.

use tracing::{debug, error, info, warn};

use crate::api::ReportApi;
use crate::error::{Error, Result};
use crate::fields::{FieldKey, ProtocolField, ProtocolFieldTree};
use crate::selector::TemplateSelection;
use crate::types::{Motor, TestReport, Tool};

/// Token for one field-set retrieval.
///
/// Only the most recently issued ticket may replace the tree, so a slow
/// response for an older selection cannot overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalTicket {
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    selection: TemplateSelection,
    tree: ProtocolFieldTree,
    tools: Vec<Tool>,
    motor: Option<Motor>,
    latest_retrieval: u64,
}

impl ReportForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &TemplateSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut TemplateSelection {
        &mut self.selection
    }

    pub fn fields(&self) -> &ProtocolFieldTree {
        &self.tree
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn motor(&self) -> Option<&Motor> {
        self.motor.as_ref()
    }

    /// Issue a ticket for the current selection, or `None` if incomplete
    pub fn begin_retrieval(&mut self) -> Option<RetrievalTicket> {
        self.selection.request()?;
        self.latest_retrieval += 1;
        Some(RetrievalTicket {
            seq: self.latest_retrieval,
        })
    }

    /// Install a retrieved field set; stale tickets are dropped.
    pub fn complete_retrieval(&mut self, ticket: RetrievalTicket, fields: Vec<ProtocolField>) -> bool {
        if ticket.seq != self.latest_retrieval {
            warn!(
                ticket = ticket.seq,
                latest = self.latest_retrieval,
                "Discarding superseded protocol field response"
            );
            return false;
        }
        debug!("Installing {} protocol fields", fields.len());
        self.tree.replace(fields);
        true
    }

    /// Fetch the field set for the current selection.
    ///
    /// Returns `Ok(false)` without calling the backend when the selection is
    /// incomplete. On failure the tree is left as it was.
    pub async fn retrieve(&mut self, api: &impl ReportApi) -> Result<bool> {
        let Some(ticket) = self.begin_retrieval() else {
            debug!("Template or motor type not selected; skipping retrieval");
            return Ok(false);
        };
        let Some((template_id, motor_type_id)) = self.selection.request() else {
            return Ok(false);
        };

        let fields = api
            .protocol_fields(template_id, motor_type_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch protocol fields: {}", e);
                e
            })?;

        Ok(self.complete_retrieval(ticket, fields))
    }

    pub fn update_field(
        &mut self,
        field_name: &str,
        sub_index: Option<usize>,
        key: FieldKey,
        value: impl Into<String>,
    ) -> bool {
        self.tree.apply(field_name, sub_index, key, value)
    }

    /// Append a tool; the same tool may be added more than once
    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    pub fn set_motor(&mut self, motor: Motor) {
        self.motor = Some(motor);
    }

    /// Snapshot the current state into a report
    pub fn assemble(&self) -> Result<TestReport> {
        let motor = self.motor.clone().ok_or(Error::MissingMotor)?;
        Ok(TestReport {
            protocol_fields: self.tree.fields().to_vec(),
            test_tools: self.tools.clone(),
            motor,
        })
    }

    /// Assemble and send the report.
    ///
    /// A missing motor fails before the backend is contacted. Transport
    /// failures are returned as-is; nothing is retried and the form is not
    /// cleared on success.
    pub async fn submit(&self, api: &impl ReportApi) -> Result<TestReport> {
        let report = self.assemble()?;
        api.submit_report(&report).await?;
        info!(
            fields = report.protocol_fields.len(),
            tools = report.test_tools.len(),
            motor = report.motor.id,
            "Submitted test report"
        );
        Ok(report)
    }
}
