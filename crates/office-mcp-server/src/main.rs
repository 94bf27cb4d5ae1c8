//! office-mcp - MCP server for Office documents

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use office_mcp_server::{logging, Dispatcher, OfficeMcp, ServerConfig, SessionRegistry};
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(name = "office-mcp")]
#[command(
    author,
    version,
    about = "Create and edit PowerPoint, Word and Excel documents over MCP"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "OFFICE_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Never drive the live Office applications
    #[arg(long, global = true)]
    no_automation: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (the default)
    Serve,

    /// Print which Office applications are reachable, as JSON
    Status,

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.log_level.as_deref(), cli.no_automation)
        .context("Invalid command-line option")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Status => status(config).await,
        Commands::Config => {
            print!("{}", config.to_toml());
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    logging::initialize(&config.logging);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        automation = config.automation.enabled,
        "starting office-mcp"
    );

    let dispatcher = Dispatcher::from_config(&config, Arc::new(SessionRegistry::new()));
    OfficeMcp::new(Arc::new(dispatcher))
        .serve_stdio()
        .await
        .context("MCP transport failed")?;

    info!("client disconnected; shutting down");
    Ok(())
}

async fn status(config: ServerConfig) -> Result<()> {
    let dispatcher = Dispatcher::from_config(&config, Arc::new(SessionRegistry::new()));
    let report = dispatcher
        .invoke_named("check_office_status", Value::Null)
        .await
        .context("Failed to query Office applications")?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).context("Failed to write report")?;
    writeln!(stdout)?;
    Ok(())
}
