//! CLI argument definitions using clap
//!
//! Commands:
//! - storefront serve [--config <path>] [--host ..] [--port ..] [--database <path>]
//! - storefront migrate [--config <path>] [--database <path>]
//!
//! Every flag can also come from the environment; flags win over the
//! environment, which wins over the config file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;

/// storefront - store records over HTTP in JSON or XML
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServiceArgs),

    /// Apply database migrations and exit
    Migrate(ServiceArgs),
}

/// Settings shared by all commands
#[derive(Args, Debug, Default, Clone)]
pub struct ServiceArgs {
    /// Path to a JSON configuration file
    #[arg(long, env = "STOREFRONT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH")]
    pub database: Option<PathBuf>,

    /// Log level or filter directive (e.g. "info", "storefront=debug")
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format: compact or json
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
