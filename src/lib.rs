//! investor-commitments - CSV to SQLite loader with a JSON query API
//!
//! Takes a flat export of investor commitments (one commitment per row, the
//! owning investor's attributes repeated on each row), normalizes it into
//! `investor` and `commitment` tables, and serves read-only endpoints over
//! the result.
//!
//! # Architecture
//!
//! ```text
//!   data.csv ──► source::read_source ──► db::writer::write_rows ──► preqin.db
//!                                         (one transaction)            │
//!                                                                      ▼
//!   HTTP client ◄── server::routes ◄── server::context (per-request read-only conn)
//! ```
//!
//! # Example
//!
//! ```bash
//! # Load once
//! investor-commitments load --source data.csv --db preqin.db
//!
//! # Serve
//! investor-commitments serve --db preqin.db --port 8000
//! curl http://localhost:8000/investors
//! curl http://localhost:8000/investor/1
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod progress;
pub mod server;
pub mod source;
pub mod types;

pub use config::{CliArgs, Command, LoadConfig, ServeConfig};
pub use error::{ConfigError, DbError, LoadError, ServerError};
pub use loader::{load, run_load, LoadSummary};
pub use types::{
    AssetClassBreakdown, AssetClassTotal, CommitmentRecord, InvestorDetail, InvestorKey,
    InvestorSummary, SourceRow,
};
