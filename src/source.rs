//! CSV source decoding
//!
//! The upstream export is a flat file with one commitment per row and the
//! owning investor's attributes repeated on every row. Columns are located by
//! header name, so column order and any extra columns do not matter.

use crate::error::{LoadError, LoadResult};
use crate::types::{InvestorKey, SourceRow};
use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Header names as written by the upstream export.
///
/// `Investory Type` is misspelled in the export itself.
pub mod columns {
    pub const INVESTOR_NAME: &str = "Investor Name";
    pub const INVESTOR_TYPE: &str = "Investory Type";
    pub const INVESTOR_COUNTRY: &str = "Investor Country";
    pub const INVESTOR_DATE_ADDED: &str = "Investor Date Added";
    pub const INVESTOR_LAST_UPDATED: &str = "Investor Last Updated";
    pub const ASSET_CLASS: &str = "Commitment Asset Class";
    pub const AMOUNT: &str = "Commitment Amount";
    pub const CURRENCY: &str = "Commitment Currency";

    /// Every column the loader needs, in a fixed order
    pub const REQUIRED: [&str; 8] = [
        INVESTOR_NAME,
        INVESTOR_TYPE,
        INVESTOR_COUNTRY,
        INVESTOR_DATE_ADDED,
        INVESTOR_LAST_UPDATED,
        ASSET_CLASS,
        AMOUNT,
        CURRENCY,
    ];
}

/// Resolved positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    investor_type: usize,
    country: usize,
    date_added: usize,
    last_updated: usize,
    asset_class: usize,
    amount: usize,
    currency: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> LoadResult<Self> {
        let mut positions = [0usize; columns::REQUIRED.len()];
        for (slot, column) in positions.iter_mut().zip(columns::REQUIRED) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: column.to_string(),
                })?;
        }

        let [name, investor_type, country, date_added, last_updated, asset_class, amount, currency] =
            positions;

        Ok(Self {
            name,
            investor_type,
            country,
            date_added,
            last_updated,
            asset_class,
            amount,
            currency,
        })
    }

    fn decode(&self, record: &StringRecord, line: u64) -> LoadResult<SourceRow> {
        let field = |idx: usize| {
            record.get(idx).map(str::to_string).ok_or_else(|| LoadError::Parse {
                line,
                reason: format!("expected at least {} fields, found {}", idx + 1, record.len()),
            })
        };

        let raw_amount = field(self.amount)?;
        let amount = parse_amount(&raw_amount).ok_or_else(|| LoadError::Parse {
            line,
            reason: format!("'{}' is not an integer amount", raw_amount),
        })?;

        Ok(SourceRow {
            investor: InvestorKey {
                name: field(self.name)?,
                investor_type: field(self.investor_type)?,
                country: field(self.country)?,
                date_added: field(self.date_added)?,
                last_updated: field(self.last_updated)?,
            },
            asset_class: field(self.asset_class)?,
            amount,
            currency: field(self.currency)?,
        })
    }
}

/// Coerce an amount cell to an integer.
///
/// Accepts plain integers and floats with no fractional part ("100.0"),
/// which is how spreadsheet tools commonly write whole numbers.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }

    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Decode source rows from any reader producing CSV with a header row
pub fn parse_source<R: Read>(reader: R) -> LoadResult<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Parse {
            line: 1,
            reason: e.to_string(),
        })?
        .clone();
    let index = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Parse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(index.decode(&record, line)?);
    }

    debug!(rows = rows.len(), "decoded source rows");
    Ok(rows)
}

/// Open and decode a source file
pub fn read_source(path: &Path) -> LoadResult<Vec<SourceRow>> {
    let file = File::open(path).map_err(|e| LoadError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_source(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Investor Name,Investory Type,Investor Country,Investor Date Added,Investor Last Updated,Commitment Asset Class,Commitment Amount,Commitment Currency";

    #[test]
    fn test_parse_two_rows() {
        let data = format!(
            "{HEADER}\nAcme,Fund,US,2020-01-01,2020-01-02,Equity,100,USD\nAcme,Fund,US,2020-01-01,2020-01-02,Debt,200,USD\n"
        );
        let rows = parse_source(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].investor.name, "Acme");
        assert_eq!(rows[0].investor.investor_type, "Fund");
        assert_eq!(rows[0].asset_class, "Equity");
        assert_eq!(rows[1].amount, 200);
        assert_eq!(rows[0].investor, rows[1].investor);
    }

    #[test]
    fn test_columns_located_by_name() {
        let data = "Commitment Currency,Extra,Commitment Amount,Commitment Asset Class,Investor Last Updated,Investor Date Added,Investor Country,Investory Type,Investor Name\n\
                    GBP,ignored,5000,Hedge Funds,2023-02-01,2000-07-06,United Kingdom,bank,Barclays\n";
        let rows = parse_source(data.as_bytes()).unwrap();

        assert_eq!(
            rows[0],
            SourceRow::new(
                "Barclays",
                "bank",
                "United Kingdom",
                "2000-07-06",
                "2023-02-01",
                "Hedge Funds",
                5000,
                "GBP"
            )
        );
    }

    #[test]
    fn test_missing_column() {
        let data = "Investor Name,Investor Country\nAcme,US\n";
        let err = parse_source(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref column } if column == columns::INVESTOR_TYPE
        ));
    }

    #[test]
    fn test_each_required_column_is_checked() {
        for dropped in columns::REQUIRED {
            let header: Vec<&str> = columns::REQUIRED
                .iter()
                .copied()
                .filter(|c| *c != dropped)
                .collect();
            let data = format!("{}\n", header.join(","));

            let err = parse_source(data.as_bytes()).unwrap_err();
            assert!(
                matches!(err, LoadError::MissingColumn { ref column } if column == dropped),
                "dropped {dropped}: {err:?}"
            );
        }
    }

    #[test]
    fn test_bad_amount_reports_line() {
        let data = format!(
            "{HEADER}\nAcme,Fund,US,2020-01-01,2020-01-02,Equity,100,USD\nAcme,Fund,US,2020-01-01,2020-01-02,Debt,lots,USD\n"
        );
        let err = parse_source(data.as_bytes()).unwrap_err();
        match err {
            LoadError::Parse { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("lots"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row() {
        let data = format!("{HEADER}\nAcme,Fund,US\n");
        let err = parse_source(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(100));
        assert_eq!(parse_amount(" 42 "), Some(42));
        assert_eq!(parse_amount("15000000000"), Some(15_000_000_000));
        assert_eq!(parse_amount("250.0"), Some(250));
        assert_eq!(parse_amount("1e6"), Some(1_000_000));
        assert_eq!(parse_amount("12.5"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_read_source_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "\"Acme, Inc\",Fund,US,2020-01-01,2020-01-02,Equity,100,USD").unwrap();

        let rows = read_source(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].investor.name, "Acme, Inc");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnreadable { .. }));
    }
}
