//! Database schema definitions and creation
//!
//! This module defines the SQLite schema for investors and their commitments
//! and provides functions to create the store and open it for reading.

use crate::error::{DbError, DbResult};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// SQL to create the investor table
const CREATE_INVESTOR_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS investor (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    type TEXT,
    country TEXT,
    date_added TEXT,
    last_updated TEXT
)
"#;

/// SQL to create the commitment table
const CREATE_COMMITMENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS commitment (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    investor_id INTEGER,
    asset_class TEXT,
    amount INTEGER,
    currency TEXT,
    FOREIGN KEY (investor_id) REFERENCES investor(id)
)
"#;

/// Indexes for the read queries
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_commitment_investor ON commitment(investor_id)",
];

/// Pragmas for the one-shot load
const WRITE_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
PRAGMA synchronous = NORMAL;
PRAGMA temp_store = MEMORY;
"#;

/// Create tables if absent and apply write pragmas.
///
/// Safe to call on an existing store; tables are never dropped.
pub fn create_database(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(WRITE_PRAGMAS)?;

    conn.execute(CREATE_INVESTOR_TABLE, [])?;
    conn.execute(CREATE_COMMITMENT_TABLE, [])?;

    Ok(())
}

/// Create indexes (run after the inserts, inside the load transaction)
pub fn create_indexes(conn: &Connection) -> DbResult<()> {
    for sql in CREATE_INDEXES {
        conn.execute(sql, [])?;
    }
    Ok(())
}

/// Refresh planner statistics after a load
pub fn optimize_for_reads(conn: &Connection) -> DbResult<()> {
    conn.execute("ANALYZE", [])?;
    Ok(())
}

/// Open (creating if needed) a store for loading
pub fn open_for_write(path: &Path) -> DbResult<Connection> {
    Connection::open(path).map_err(|e| DbError::OpenFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Open an existing store read-only.
///
/// Fails with `DbError::OpenFailed` when the file does not exist instead of
/// silently creating an empty database.
pub fn open_read_only(path: &Path) -> DbResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags).map_err(|e| DbError::OpenFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Count rows in a table, for summaries and tests
pub fn count_rows(conn: &Connection, table: Table) -> DbResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

/// Tables known to the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Investor,
    Commitment,
}

impl Table {
    /// Table name as it appears in SQL
    pub const fn as_str(self) -> &'static str {
        match self {
            Table::Investor => "investor",
            Table::Commitment => "commitment",
        }
    }
}
