//! # Status CLI Tool
//!
//! Command-line interface for querying service status through the status client.
//! Uses hosted edge functions when `SUPABASE_URL` and `SUPABASE_ANON_KEY` are set,
//! the same-origin fallback endpoints otherwise.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::info;

use status_client::{
    logging, ClientConfig, FunctionsClient, HttpMethod, InvokeOptions, InvokeResponse,
    StatusAction, StatusClient,
};

#[derive(Parser, Debug)]
#[command(name = "status-cli")]
#[command(about = "Command-line interface for service status endpoints")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: ./status-client.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the service overview
    Overview,
    /// Fetch one aggregator action
    Aggregate {
        /// overview, incidents, maintenances or components
        #[arg(short, long, default_value = "overview")]
        action: String,
    },
    /// Invoke a function by name
    Invoke {
        /// Function name (status-overview, status-aggregator)
        name: String,
        /// HTTP method hint (GET or POST)
        #[arg(short, long)]
        method: Option<HttpMethod>,
        /// Request body as a JSON string
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Fetch overview, incidents, maintenances and components together
    Snapshot,
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the loaded configuration and the selected backend
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    logging::init_with_level(Some(log_level));

    let config = match &cli.config {
        Some(path) => ClientConfig::load_from_file(std::path::Path::new(path))
            .with_context(|| format!("failed to load config from {}", path))?,
        None => ClientConfig::load().context("failed to load configuration")?,
    };

    let client = StatusClient::from_config(&config).context("failed to build status client")?;
    info!(
        transport = client.transport_name(),
        endpoint = client.endpoint(),
        "Status CLI starting"
    );

    let ok = match cli.command {
        Commands::Overview => print_response(cli.format, &client.status_overview().await),
        Commands::Aggregate { action } => {
            let response = client
                .invoke("status-aggregator", InvokeOptions::with_action(&action))
                .await;
            print_response(cli.format, &response)
        }
        Commands::Invoke { name, method, body } => {
            let body = body
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()
                .context("--body must be valid JSON")?;
            let response = client.invoke(&name, InvokeOptions { method, body }).await;
            print_response(cli.format, &response)
        }
        Commands::Snapshot => {
            let (overview, incidents, maintenances, components) = futures::join!(
                client.aggregate(StatusAction::Overview),
                client.aggregate(StatusAction::Incidents),
                client.aggregate(StatusAction::Maintenances),
                client.aggregate(StatusAction::Components),
            );
            let ok = [&overview, &incidents, &maintenances, &components]
                .iter()
                .all(|r| r.is_ok());
            let snapshot = json!({
                "fetched_at": chrono::Utc::now().to_rfc3339(),
                "transport": client.transport_name(),
                "overview": overview,
                "incidents": incidents,
                "maintenances": maintenances,
                "components": components,
            });
            print_value(cli.format, &snapshot)?;
            ok
        }
        Commands::Config(ConfigCommands::Show) => {
            let mut shown = serde_json::to_value(&config)?;
            if let Some(key) = shown.pointer_mut("/hosted/anon_key") {
                if !key.is_null() {
                    *key = json!("<redacted>");
                }
            }
            let output = json!({
                "config": shown,
                "transport": client.transport_name(),
                "endpoint": client.endpoint(),
            });
            print_value(cli.format, &output)?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Print a response; returns whether it carried data
fn print_response(format: OutputFormat, response: &InvokeResponse) -> bool {
    match serde_json::to_value(response) {
        Ok(value) => {
            if let Err(e) = print_value(format, &value) {
                eprintln!("failed to render response: {}", e);
                return false;
            }
        }
        Err(e) => {
            eprintln!("failed to render response: {}", e);
            return false;
        }
    }
    response.is_ok()
}

fn print_value(format: OutputFormat, value: &Value) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    println!("{}", rendered);
    Ok(())
}
