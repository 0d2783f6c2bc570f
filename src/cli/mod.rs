//! CLI module for storefront
//!
//! Provides command-line interface for:
//! - serve: Open the database and run the HTTP server
//! - migrate: Bring the database schema up to date and exit

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, ServiceArgs};
pub use commands::{migrate, run, run_command, serve};
pub use config::ServiceConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
