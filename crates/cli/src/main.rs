//! MotorTest CLI - Main Entry Point
//!
//! Maintains the tool and motor catalogs and fills in and submits motor
//! acceptance test reports against the MotorTest backend.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use motortest_cli::commands::{fields, motors, report, templates, tools};
use motortest_cli::output::{self, print_error};
use motortest_cli::{ApiClient, ClientConfig};

/// MotorTest CLI - Electric Motor Acceptance Test Reports
#[derive(Parser)]
#[command(name = "motortest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file [default: ~/.motortest/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend API URL (overrides the configuration file)
    #[arg(long, env = "MOTORTEST_API_URL", global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the tool catalog
    #[command(subcommand)]
    Tools(tools::ToolCommands),

    /// Manage the motor catalog
    #[command(subcommand)]
    Motors(motors::MotorCommands),

    /// List known templates and motor types
    Templates,

    /// Show the protocol fields for a template and motor type
    Fields(fields::FieldsArgs),

    /// Submit and list test reports
    #[command(subcommand)]
    Report(report::ReportCommands),

    /// Check backend status
    Status,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(motortest_common::default_config_path);
    let config = ClientConfig::load(&config_path)?.with_api_url(cli.api_url);
    let client = ApiClient::from_config(&config)?;
    tracing::debug!("Using backend at {}", client.base_url());

    match cli.command {
        Commands::Tools(cmd) => tools::execute(cmd, &client, cli.format).await?,
        Commands::Motors(cmd) => motors::execute(cmd, &client, cli.format).await?,
        Commands::Templates => templates::execute(&client, cli.format).await?,
        Commands::Fields(args) => fields::execute(args, &client, cli.format).await?,
        Commands::Report(cmd) => report::execute(cmd, &client, cli.format).await?,
        Commands::Status => {
            if client.health_check().await {
                println!("✅ Backend is running at {}", client.base_url());
            } else {
                anyhow::bail!("Backend is not responding at {}", client.base_url());
            }
        }
        Commands::Version => {
            println!("MotorTest CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Electric motor acceptance test reports");
            println!();
            println!("Default API: {}", motortest_common::DEFAULT_API_URL);
            println!("Config file: {}", config_path.display());
        }
    }

    Ok(())
}
