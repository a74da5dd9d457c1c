//! Tool catalog commands

use anyhow::{bail, Result};
use clap::Subcommand;
use motortest_common::{RecordId, Tool};

use crate::client::ApiClient;
use crate::commands::catalog;
use crate::output::{print_info, print_item, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ToolCommands {
    /// List all tools
    List,

    /// Add a tool
    Add {
        /// Tool name
        #[arg(short, long)]
        name: String,

        /// Serial number
        #[arg(short, long)]
        serial: String,

        /// Category
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// Update a tool
    Update {
        /// Tool ID
        id: RecordId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        serial: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a tool
    Delete {
        /// Tool ID
        id: RecordId,
    },

    /// List category suggestions
    Categories,

    /// Search tools by name
    Search {
        query: String,
    },

    /// Browse tools grouped by category
    Browse {
        /// Expand only this category
        #[arg(long)]
        category: Option<String>,
    },
}

impl TableDisplay for Tool {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Serial", "Category"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.serial_number.clone(),
            self.category.clone(),
        ]
    }
}

pub async fn execute(cmd: ToolCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ToolCommands::List => catalog::list::<Tool>(client, format).await?,

        ToolCommands::Add { name, serial, category } => {
            let mut manager = catalog::load::<Tool>(client).await?;
            let is_new_category = !category.is_empty() && !manager.categories().contains(&category);

            let draft = manager.draft_mut();
            draft.name = name;
            draft.serial_number = serial;
            draft.category = category.clone();

            if let Some(tool) = manager.submit_editor(client).await? {
                print_success(&format!("Tool '{}' added with id {}", tool.name, tool.id));
                if is_new_category {
                    print_info(&format!("New category '{}'", category));
                }
                print_item(&tool, format);
            }
        }

        ToolCommands::Update { id, name, serial, category } => {
            let mut manager = catalog::load::<Tool>(client).await?;
            if !manager.begin_edit(id) {
                bail!("No tool with id {}", id);
            }

            if let Some(tool) = manager.editing_mut() {
                if let Some(name) = name {
                    tool.name = name;
                }
                if let Some(serial) = serial {
                    tool.serial_number = serial;
                }
                if let Some(category) = category {
                    tool.category = category;
                }
            }

            if let Some(tool) = manager.submit_editor(client).await? {
                print_success(&format!("Tool {} updated", tool.id));
                print_item(&tool, format);
            }
        }

        ToolCommands::Delete { id } => catalog::delete::<Tool>(client, id).await?,

        ToolCommands::Categories => catalog::categories::<Tool>(client, format).await?,

        ToolCommands::Search { query } => catalog::search::<Tool>(client, &query, format).await?,

        ToolCommands::Browse { category } => {
            catalog::browse::<Tool>(client, category.as_deref(), format).await?
        }
    }

    Ok(())
}
