//! Test report commands

use anyhow::{anyhow, Result};
use clap::Subcommand;
use motortest_common::{FieldKey, Motor, ReportForm, StoredReport, TemplateSelection, Tool};
use serde::Serialize;
use std::str::FromStr;
use tracing::warn;

use crate::client::ApiClient;
use crate::commands::catalog;
use crate::output::{field_rows, print_list, print_success, print_warning, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Fill in and submit a test report
    Submit {
        /// Template ID
        #[arg(short, long)]
        template: String,

        /// Motor type ID
        #[arg(short, long)]
        motor_type: String,

        /// Field value, as NAME=VALUE or GROUP[INDEX]=VALUE (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<FieldEdit>,

        /// Field rename, as NAME=NEW or GROUP[INDEX]=NEW (repeatable)
        #[arg(long = "rename", value_name = "FIELD=NAME")]
        rename: Vec<FieldEdit>,

        /// Tool as `id:<n>`, a bare id, or search text (repeatable)
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<String>,

        /// Motor as `id:<n>`, a bare id, or search text (model or serial)
        #[arg(long)]
        motor: Option<String>,

        /// Print the report instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// List submitted reports
    List,
}

/// One `--set`/`--rename` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: String,
    pub index: Option<usize>,
    pub value: String,
}

impl FromStr for FieldEdit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;

        let (field, index) = match target.strip_suffix(']').and_then(|t| t.rsplit_once('[')) {
            Some((field, index)) => {
                let index = index
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid sub-field index '{}' in '{}'", index, s))?;
                (field, Some(index))
            }
            None => (target, None),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in '{}'", s));
        }

        Ok(Self {
            field: field.to_string(),
            index,
            value: value.to_string(),
        })
    }
}

/// Apply edits in order, returning the ones that matched nothing
fn apply_edits<'a>(form: &mut ReportForm, edits: &'a [FieldEdit], key: FieldKey) -> Vec<&'a FieldEdit> {
    edits
        .iter()
        .filter(|edit| !form.update_field(&edit.field, edit.index, key, edit.value.clone()))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub received_at: String,
    pub motor: String,
    pub tools: usize,
    pub fields: usize,
}

impl From<&StoredReport> for ReportRow {
    fn from(stored: &StoredReport) -> Self {
        let motor = &stored.report.motor;
        Self {
            id: stored.id.to_string(),
            received_at: stored.received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            motor: format!("{} - {}", motor.model, motor.serial_number),
            tools: stored.report.test_tools.len(),
            fields: stored.report.protocol_fields.len(),
        }
    }
}

impl TableDisplay for ReportRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Received", "Motor", "Tools", "Fields"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.received_at.clone(),
            self.motor.clone(),
            self.tools.to_string(),
            self.fields.to_string(),
        ]
    }
}

pub async fn execute(cmd: ReportCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ReportCommands::Submit {
            template,
            motor_type,
            set,
            rename,
            tools,
            motor,
            dry_run,
        } => {
            let mut form = ReportForm::new();
            *form.selection_mut() = TemplateSelection::new(template, motor_type);

            let (retrieved, tool_catalog, motor_catalog) = tokio::join!(
                form.retrieve(client),
                catalog::load::<Tool>(client),
                catalog::load::<Motor>(client),
            );
            if !retrieved? {
                return Err(anyhow!("Both a template and a motor type are required"));
            }
            let (tool_catalog, motor_catalog) = (tool_catalog?, motor_catalog?);

            // Renames first so values can target the new names
            let unmatched = apply_edits(&mut form, &rename, FieldKey::Name)
                .into_iter()
                .chain(apply_edits(&mut form, &set, FieldKey::Value))
                .map(|edit| edit.field.clone())
                .collect::<Vec<_>>();
            for field in &unmatched {
                warn!("No protocol field '{}' to update", field);
                print_warning(&format!("Field '{}' not found; ignored", field));
            }

            for needle in &tools {
                form.add_tool(catalog::resolve(tool_catalog.records(), needle)?);
            }
            if let Some(needle) = &motor {
                form.set_motor(catalog::resolve(motor_catalog.records(), needle)?);
            }

            if dry_run {
                let report = form.assemble()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let report = form.submit(client).await?;
            print_success(&format!(
                "Report submitted for motor {} with {} tool(s)",
                report.motor.model,
                report.test_tools.len()
            ));
            print_list(&field_rows(&report.protocol_fields), format);
        }

        ReportCommands::List => {
            let reports = client.list_reports().await?;
            let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();
            print_list(&rows, format);
        }
    }

    Ok(())
}
