//! SQLite storage for investors and commitments
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │  load (one-shot)     │        │  serve (per request) │
//! │  writer::write_rows  │        │  reader::*           │
//! └──────────┬───────────┘        └──────────┬───────────┘
//!            │ single transaction            │ read-only connection
//!            ▼                               ▼
//!        ┌─────────────────────────────────────────┐
//!        │   SQLite file: investor, commitment     │
//!        └─────────────────────────────────────────┘
//! ```
//!
//! The loader and the query service never run against the same file at
//! the same time.

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{investor_asset_classes, investor_commitments, list_investors};
pub use schema::{create_database, create_indexes, open_read_only, optimize_for_reads};
pub use writer::{write_rows, WriteStats};
