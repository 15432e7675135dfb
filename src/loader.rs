//! One-shot load of a CSV export into the SQLite store
//!
//! Reads and decodes the whole source before opening the store, then hands
//! the rows to the transactional writer. A malformed source therefore never
//! touches the database, and a storage failure mid-write rolls back. Only
//! the planner statistics refresh runs after commit, and its failure is
//! logged rather than reported.

use crate::config::LoadConfig;
use crate::db::{schema, writer};
use crate::error::LoadResult;
use crate::progress::ProgressReporter;
use crate::source;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of a successful load
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Rows decoded from the source
    pub source_rows: u64,

    /// Distinct investors inserted
    pub investors: u64,

    /// Commitments inserted
    pub commitments: u64,

    /// Wall-clock time for the whole load
    pub duration: Duration,

    /// Source that was read
    pub source_path: PathBuf,

    /// Store that was written
    pub db_path: PathBuf,
}

impl LoadSummary {
    /// Size of the store file on disk, if it can be read
    pub fn db_size(&self) -> Option<u64> {
        std::fs::metadata(&self.db_path).ok().map(|m| m.len())
    }

    /// One-line confirmation printed when a load finishes
    pub fn confirmation(&self) -> String {
        format!(
            "Database created at {} from {}",
            self.db_path.display(),
            self.source_path.display()
        )
    }
}

/// Run a load, optionally reporting status on a spinner
pub fn run_load(config: &LoadConfig, progress: Option<&ProgressReporter>) -> LoadResult<LoadSummary> {
    let start = Instant::now();

    if let Some(p) = progress {
        p.set_status("Reading source...");
    }
    let rows = source::read_source(&config.source_path)?;
    info!(
        source = %config.source_path.display(),
        rows = rows.len(),
        "source decoded"
    );

    if let Some(p) = progress {
        p.set_status(&format!("Writing {} rows...", rows.len()));
    }
    let conn = schema::open_for_write(&config.db_path)?;
    let stats = writer::write_rows(&conn, &rows)?;

    if let Some(p) = progress {
        p.set_status("Analyzing...");
    }
    // Rows are committed at this point; stale statistics only slow queries
    if let Err(e) = schema::optimize_for_reads(&conn) {
        warn!(error = %e, "ANALYZE failed after load");
    }
    drop(conn);

    let summary = LoadSummary {
        source_rows: rows.len() as u64,
        investors: stats.investors_written,
        commitments: stats.commitments_written,
        duration: start.elapsed(),
        source_path: config.source_path.clone(),
        db_path: config.db_path.clone(),
    };

    info!(
        db = %config.db_path.display(),
        investors = summary.investors,
        commitments = summary.commitments,
        "load complete"
    );

    Ok(summary)
}

/// Load without progress output
pub fn load(config: &LoadConfig) -> LoadResult<LoadSummary> {
    run_load(config, None)
}
