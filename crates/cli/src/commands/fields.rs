//! Protocol field retrieval

use anyhow::{bail, Result};
use clap::Args;
use motortest_common::{ReportForm, TemplateSelection};

use crate::client::ApiClient;
use crate::output::{field_rows, print_list, OutputFormat};

#[derive(Args)]
pub struct FieldsArgs {
    /// Template ID (see `motortest templates`)
    #[arg(short, long)]
    pub template: String,

    /// Motor type ID
    #[arg(short, long)]
    pub motor_type: String,
}

pub async fn execute(args: FieldsArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let mut form = ReportForm::new();
    *form.selection_mut() = TemplateSelection::new(args.template, args.motor_type);

    if !form.retrieve(client).await? {
        bail!("Both a template and a motor type are required");
    }

    print_list(&field_rows(form.fields().fields()), format);
    Ok(())
}
