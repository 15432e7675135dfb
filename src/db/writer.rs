//! Transactional writer for the one-shot load
//!
//! Splits decoded source rows into investors and commitments and inserts
//! both inside a single transaction:
//!
//! 1. Distinct investors (exact match on all five identity attributes, first
//!    occurrence order) are inserted and their row ids captured.
//! 2. One commitment per source row is inserted, its owner resolved through
//!    the `InvestorKey -> id` map built in step 1.
//!
//! 3. The read indexes are created.
//!
//! Nothing is committed until all three steps succeed, so a failure anywhere
//! leaves the store without any of this load's rows.

use crate::db::schema;
use crate::error::{LoadError, LoadResult};
use crate::types::{InvestorKey, SourceRow};
use rusqlite::{params, Connection};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Counts produced by a single write
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    /// Distinct investors inserted
    pub investors_written: u64,

    /// Commitments inserted (one per source row)
    pub commitments_written: u64,
}

/// Collapse rows to their distinct investors, keeping first-occurrence order
pub fn distinct_investors(rows: &[SourceRow]) -> Vec<&InvestorKey> {
    let mut seen: HashSet<&InvestorKey> = HashSet::with_capacity(rows.len() / 4);
    let mut distinct = Vec::new();

    for row in rows {
        if seen.insert(&row.investor) {
            distinct.push(&row.investor);
        }
    }

    distinct
}

/// Create the schema if needed and write all rows in one transaction
pub fn write_rows(conn: &Connection, rows: &[SourceRow]) -> LoadResult<WriteStats> {
    schema::create_database(conn)?;

    let tx = conn.unchecked_transaction()?;
    let mut stats = WriteStats::default();
    let investors = distinct_investors(rows);
    let mut key_to_id: HashMap<&InvestorKey, i64> = HashMap::with_capacity(investors.len());

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO investor (name, type, country, date_added, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for key in investors {
            stmt.execute(params![
                key.name,
                key.investor_type,
                key.country,
                key.date_added,
                key.last_updated,
            ])?;

            key_to_id.insert(key, tx.last_insert_rowid());
            stats.investors_written += 1;
        }
    }

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO commitment (investor_id, asset_class, amount, currency)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (idx, row) in rows.iter().enumerate() {
            let investor_id = key_to_id.get(&row.investor).copied().ok_or_else(|| {
                LoadError::UnresolvedInvestor {
                    row: idx,
                    name: row.investor.name.clone(),
                }
            })?;

            stmt.execute(params![investor_id, row.asset_class, row.amount, row.currency])?;

            stats.commitments_written += 1;
        }
    }

    schema::create_indexes(&tx)?;
    tx.commit()?;

    debug!(
        investors = stats.investors_written,
        commitments = stats.commitments_written,
        "load transaction committed"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{count_rows, Table};

    fn acme(asset_class: &str, amount: i64) -> SourceRow {
        SourceRow::new("Acme", "Fund", "US", "2020-01-01", "2020-01-02", asset_class, amount, "USD")
    }

    #[test]
    fn test_round_trip_two_rows_one_investor() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = vec![acme("Equity", 100), acme("Debt", 200)];

        let stats = write_rows(&conn, &rows).unwrap();
        assert_eq!(stats.investors_written, 1);
        assert_eq!(stats.commitments_written, 2);

        let (id, name): (i64, String) = conn
            .query_row("SELECT id, name FROM investor", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!(name, "Acme");

        let (count, total): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), SUM(amount) FROM commitment WHERE investor_id = ?1",
                [id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(total, 300);
    }

    #[test]
    fn test_distinct_investors_keep_first_occurrence_order() {
        let rows = vec![
            SourceRow::new("Zeta", "Bank", "UK", "d1", "d2", "Equity", 1, "GBP"),
            acme("Equity", 1),
            SourceRow::new("Zeta", "Bank", "UK", "d1", "d2", "Debt", 2, "GBP"),
            acme("Debt", 2),
        ];

        let distinct = distinct_investors(&rows);
        let names: Vec<_> = distinct.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Acme"]);
    }

    #[test]
    fn test_same_name_different_attributes_stay_separate() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = vec![
            acme("Equity", 100),
            SourceRow::new("Acme", "Fund", "US", "2020-01-01", "2021-06-30", "Debt", 50, "USD"),
        ];

        let stats = write_rows(&conn, &rows).unwrap();
        assert_eq!(stats.investors_written, 2);

        let mut stmt = conn
            .prepare(
                "SELECT i.last_updated, c.amount FROM commitment c JOIN investor i ON i.id = c.investor_id ORDER BY c.id",
            )
            .unwrap();
        let owners: Vec<(String, i64)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            owners,
            vec![("2020-01-02".to_string(), 100), ("2021-06-30".to_string(), 50)]
        );
    }

    #[test]
    fn test_every_commitment_resolves_to_investor() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = vec![
            acme("Equity", 1),
            SourceRow::new("Beta", "Pension", "CA", "d1", "d2", "Infra", 5, "CAD"),
            acme("Debt", 2),
            SourceRow::new("Gamma", "Family Office", "SG", "d1", "d2", "Equity", 9, "SGD"),
        ];
        write_rows(&conn, &rows).unwrap();

        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM commitment c LEFT JOIN investor i ON i.id = c.investor_id WHERE i.id IS NULL",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(count_rows(&conn, Table::Investor).unwrap(), 3);
        assert_eq!(count_rows(&conn, Table::Commitment).unwrap(), 4);
    }

    #[test]
    fn test_second_write_appends_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = vec![acme("Equity", 100), acme("Debt", 200)];

        write_rows(&conn, &rows).unwrap();
        write_rows(&conn, &rows).unwrap();

        assert_eq!(count_rows(&conn, Table::Investor).unwrap(), 2);
        assert_eq!(count_rows(&conn, Table::Commitment).unwrap(), 4);
    }

    #[test]
    fn test_failure_mid_write_persists_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_database(&conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_negative BEFORE INSERT ON commitment
             WHEN NEW.amount < 0
             BEGIN SELECT RAISE(ABORT, 'negative amount'); END;",
        )
        .unwrap();

        let rows = vec![acme("Equity", 100), acme("Debt", -1), acme("Infra", 5)];
        let err = write_rows(&conn, &rows).unwrap_err();
        assert!(matches!(err, LoadError::Db(_)));

        assert_eq!(count_rows(&conn, Table::Investor).unwrap(), 0);
        assert_eq!(count_rows(&conn, Table::Commitment).unwrap(), 0);
    }

    #[test]
    fn test_index_failure_rolls_back_rows() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_database(&conn).unwrap();
        // A table holding the index name makes CREATE INDEX fail
        conn.execute_batch("CREATE TABLE idx_commitment_investor (x INTEGER);")
            .unwrap();

        let rows = vec![acme("Equity", 100), acme("Debt", 200)];
        let err = write_rows(&conn, &rows).unwrap_err();
        assert!(matches!(err, LoadError::Db(_)));

        assert_eq!(count_rows(&conn, Table::Investor).unwrap(), 0);
        assert_eq!(count_rows(&conn, Table::Commitment).unwrap(), 0);
    }

    #[test]
    fn test_write_creates_read_index() {
        let conn = Connection::open_in_memory().unwrap();
        write_rows(&conn, &[acme("Equity", 100)]).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_commitment_investor'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_source_creates_empty_tables() {
        let conn = Connection::open_in_memory().unwrap();
        let stats = write_rows(&conn, &[]).unwrap();

        assert_eq!(stats, WriteStats::default());
        assert_eq!(count_rows(&conn, Table::Investor).unwrap(), 0);
        assert_eq!(count_rows(&conn, Table::Commitment).unwrap(), 0);
    }
}
