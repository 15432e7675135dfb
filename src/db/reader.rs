//! Read queries backing the HTTP API
//!
//! Every query is fixed text with bound parameters; caller-supplied values
//! never reach the SQL string.

use crate::error::DbResult;
use crate::types::{AssetClassTotal, CommitmentRecord, InvestorDetail, InvestorSummary};
use rusqlite::{params, Connection};

/// Investors with the sum of their commitments.
///
/// Inner join: an investor without any commitment does not appear.
const LIST_INVESTORS: &str = r#"
SELECT i.id, i.name, i.type, i.country, i.date_added, SUM(c.amount)
FROM investor AS i
JOIN commitment AS c ON i.id = c.investor_id
GROUP BY i.id
ORDER BY i.id
"#;

const INVESTOR_COMMITMENTS: &str = r#"
SELECT id, asset_class, currency, amount
FROM commitment
WHERE investor_id = ?1
ORDER BY id
"#;

const INVESTOR_ASSET_CLASSES: &str = r#"
SELECT asset_class, SUM(amount) AS total, COUNT(*)
FROM commitment
WHERE investor_id = ?1
GROUP BY asset_class
ORDER BY total DESC, asset_class
"#;

/// List every investor that has at least one commitment
pub fn list_investors(conn: &Connection) -> DbResult<Vec<InvestorSummary>> {
    let mut stmt = conn.prepare_cached(LIST_INVESTORS)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(InvestorSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                investor_type: row.get(2)?,
                country: row.get(3)?,
                date_added: row.get(4)?,
                commitments: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// All commitments owned by `investor_id`.
///
/// Does not check that the investor exists: an unknown id yields an empty
/// list, same as an investor with no commitments.
pub fn investor_commitments(conn: &Connection, investor_id: i64) -> DbResult<InvestorDetail> {
    let mut stmt = conn.prepare_cached(INVESTOR_COMMITMENTS)?;
    let commitments = stmt
        .query_map(params![investor_id], |row| {
            Ok(CommitmentRecord {
                id: row.get(0)?,
                asset_class: row.get(1)?,
                currency: row.get(2)?,
                amount: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InvestorDetail {
        investor_id,
        commitments,
    })
}

/// Per-asset-class totals for `investor_id`, largest first
pub fn investor_asset_classes(conn: &Connection, investor_id: i64) -> DbResult<Vec<AssetClassTotal>> {
    let mut stmt = conn.prepare_cached(INVESTOR_ASSET_CLASSES)?;
    let totals = stmt
        .query_map(params![investor_id], |row| {
            Ok(AssetClassTotal {
                asset_class: row.get(0)?,
                amount: row.get(1)?,
                count: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(totals)
}
