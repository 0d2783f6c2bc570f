//! CLI command implementations
//!
//! `serve` boots in a fixed order: configuration, logging, storage
//! (including migrations), then the HTTP listener.

use std::sync::Arc;

use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::storage::{SqliteStoreRepository, StoreRepository};

use super::args::{Command, ServiceArgs};
use super::config::ServiceConfig;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Migrate(args) => migrate(&args),
    }
}

/// Resolve configuration and install the log subscriber
fn boot(args: &ServiceArgs) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::resolve(args)?;
    init_logging(&config.log_level, config.log_format).map_err(CliError::logging_error)?;
    Ok(config)
}

fn open_repository(config: &ServiceConfig) -> CliResult<SqliteStoreRepository> {
    let repository = SqliteStoreRepository::open(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "store database ready");
    Ok(repository)
}

/// Start the HTTP server
pub fn serve(args: &ServiceArgs) -> CliResult<()> {
    let config = boot(args)?;
    let repository: Arc<dyn StoreRepository> = Arc::new(open_repository(&config)?);

    let server = HttpServer::new(config.http.clone(), repository);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Apply migrations to the configured database and exit
pub fn migrate(args: &ServiceArgs) -> CliResult<()> {
    let config = boot(args)?;
    let repository = open_repository(&config)?;
    let rows = repository.count()?;
    println!(
        "{} migrated ({} stores)",
        config.database_path.display(),
        rows
    );
    Ok(())
}
