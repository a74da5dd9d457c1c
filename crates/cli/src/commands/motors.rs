//! Motor catalog commands

use anyhow::{bail, Result};
use clap::Subcommand;
use motortest_common::{Motor, RecordId};

use crate::client::ApiClient;
use crate::commands::catalog;
use crate::output::{print_info, print_item, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum MotorCommands {
    /// List all motors
    List,

    /// Add a motor
    Add {
        /// Model designation
        #[arg(short, long)]
        model: String,

        /// Serial number
        #[arg(short, long)]
        serial: String,

        /// Rated power in kW
        #[arg(short, long)]
        power: f64,

        /// Rated voltage in V
        #[arg(long)]
        voltage: f64,

        /// Category
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// Update a motor
    Update {
        /// Motor ID
        id: RecordId,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(short, long)]
        serial: Option<String>,

        #[arg(short, long)]
        power: Option<f64>,

        #[arg(long)]
        voltage: Option<f64>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a motor
    Delete {
        /// Motor ID
        id: RecordId,
    },

    /// List category suggestions
    Categories,

    /// Search motors by model or serial number
    Search {
        query: String,
    },

    /// Browse motors grouped by category
    Browse {
        /// Expand only this category
        #[arg(long)]
        category: Option<String>,
    },
}

impl TableDisplay for Motor {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Model", "Serial", "Power", "Voltage", "Category"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.model.clone(),
            self.serial_number.clone(),
            format!("{} kW", self.power),
            format!("{} V", self.voltage),
            self.category.clone(),
        ]
    }
}

pub async fn execute(cmd: MotorCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        MotorCommands::List => catalog::list::<Motor>(client, format).await?,

        MotorCommands::Add {
            model,
            serial,
            power,
            voltage,
            category,
        } => {
            let mut manager = catalog::load::<Motor>(client).await?;
            let is_new_category = !category.is_empty() && !manager.categories().contains(&category);

            let draft = manager.draft_mut();
            draft.model = model;
            draft.serial_number = serial;
            draft.power = power;
            draft.voltage = voltage;
            draft.category = category.clone();

            if let Some(motor) = manager.submit_editor(client).await? {
                print_success(&format!("Motor '{}' added with id {}", motor.model, motor.id));
                if is_new_category {
                    print_info(&format!("New category '{}'", category));
                }
                print_item(&motor, format);
            }
        }

        MotorCommands::Update {
            id,
            model,
            serial,
            power,
            voltage,
            category,
        } => {
            let mut manager = catalog::load::<Motor>(client).await?;
            if !manager.begin_edit(id) {
                bail!("No motor with id {}", id);
            }

            if let Some(motor) = manager.editing_mut() {
                if let Some(model) = model {
                    motor.model = model;
                }
                if let Some(serial) = serial {
                    motor.serial_number = serial;
                }
                if let Some(power) = power {
                    motor.power = power;
                }
                if let Some(voltage) = voltage {
                    motor.voltage = voltage;
                }
                if let Some(category) = category {
                    motor.category = category;
                }
            }

            if let Some(motor) = manager.submit_editor(client).await? {
                print_success(&format!("Motor {} updated", motor.id));
                print_item(&motor, format);
            }
        }

        MotorCommands::Delete { id } => catalog::delete::<Motor>(client, id).await?,

        MotorCommands::Categories => catalog::categories::<Motor>(client, format).await?,

        MotorCommands::Search { query } => catalog::search::<Motor>(client, &query, format).await?,

        MotorCommands::Browse { category } => {
            catalog::browse::<Motor>(client, category.as_deref(), format).await?
        }
    }

    Ok(())
}
