//! Configuration types for investor-commitments
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Validated runtime configuration for the `load` and `serve` commands
//!
//! Store and source paths always arrive here as arguments (or the
//! `INVESTORS_DB` environment variable); nothing below reads a hardcoded path.

use crate::error::ConfigError;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default source export
pub const DEFAULT_SOURCE: &str = "data.csv";

/// Default SQLite store
pub const DEFAULT_DB: &str = "preqin.db";

/// Investor commitments loader and query service
#[derive(Parser, Debug, Clone)]
#[command(
    name = "investor-commitments",
    version,
    about = "Load investor commitments from CSV into SQLite and serve them as JSON",
    long_about = "Two steps:\n\
                  1. load: split a flat CSV export into investor and commitment tables\n\
                  2. serve: expose read-only JSON endpoints over the loaded store",
    after_help = "EXAMPLES:\n    \
        investor-commitments load --source data.csv --db preqin.db\n    \
        investor-commitments serve --db preqin.db --port 8000\n    \
        INVESTORS_DB=/srv/preqin.db investor-commitments serve"
)]
pub struct CliArgs {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load a CSV export into the SQLite store
    Load {
        /// CSV file to read
        #[arg(short, long, default_value = DEFAULT_SOURCE, value_name = "FILE")]
        source: PathBuf,

        /// SQLite file to create or append to
        #[arg(long, env = "INVESTORS_DB", default_value = DEFAULT_DB, value_name = "FILE")]
        db: PathBuf,

        /// Quiet mode - suppress progress and summary output
        #[arg(short = 'q', long)]
        quiet: bool,
    },

    /// Serve the JSON API over a loaded store
    Serve {
        /// SQLite file to read
        #[arg(long, env = "INVESTORS_DB", default_value = DEFAULT_DB, value_name = "FILE")]
        db: PathBuf,

        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,
    },
}

/// Validated configuration for a load
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// CSV source file
    pub source_path: PathBuf,

    /// SQLite store to write
    pub db_path: PathBuf,

    /// Show progress indicator and summary
    pub show_progress: bool,
}

impl LoadConfig {
    /// Build a config without touching the filesystem
    pub fn new(source_path: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            db_path: db_path.into(),
            show_progress: false,
        }
    }

    /// Validate paths from CLI arguments
    pub fn from_args(source: PathBuf, db: PathBuf, quiet: bool) -> Result<Self, ConfigError> {
        if !source.is_file() {
            return Err(ConfigError::SourceNotFound { path: source });
        }

        if let Some(parent) = db.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::InvalidDbPath {
                    path: db.clone(),
                    reason: format!("Parent directory '{}' does not exist", parent.display()),
                });
            }
        }

        Ok(Self {
            source_path: source,
            db_path: db,
            show_progress: !quiet,
        })
    }
}

/// Validated configuration for the query service
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// SQLite store to read
    pub db_path: PathBuf,

    /// Socket to listen on
    pub addr: SocketAddr,
}

impl ServeConfig {
    /// Parse the bind address from CLI arguments.
    ///
    /// The store is not checked here: a missing store is reported per
    /// request as storage unavailable, so the service can start before the
    /// first load.
    pub fn from_args(db: PathBuf, bind: &str, port: u16) -> Result<Self, ConfigError> {
        let addr: SocketAddr = format!("{}:{}", bind, port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                addr: format!("{}:{}", bind, port),
                reason: e.to_string(),
            })?;

        Ok(Self { db_path: db, addr })
    }
}
