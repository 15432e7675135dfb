//! Core record types shared by the loader and the query service
//!
//! Source-side records (`SourceRow`, `InvestorKey`) describe what comes out
//! of the CSV export. Query-side records (`InvestorSummary`, `CommitmentRecord`,
//! ...) are what the HTTP API serializes.

use serde::Serialize;

/// Identity attributes of an investor as they appear in the source.
///
/// Two rows describe the same investor only when all five fields match
/// exactly. The loader uses this as its lookup key so that investors
/// sharing a name never collapse into one another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvestorKey {
    pub name: String,
    pub investor_type: String,
    pub country: String,
    pub date_added: String,
    pub last_updated: String,
}

/// One decoded row of the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// Owning investor identity
    pub investor: InvestorKey,

    /// Commitment asset class (e.g. "Private Equity")
    pub asset_class: String,

    /// Committed amount in whole currency units
    pub amount: i64,

    /// ISO currency code
    pub currency: String,
}

impl SourceRow {
    /// Convenience constructor, mostly for tests and benches
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        investor_type: &str,
        country: &str,
        date_added: &str,
        last_updated: &str,
        asset_class: &str,
        amount: i64,
        currency: &str,
    ) -> Self {
        Self {
            investor: InvestorKey {
                name: name.to_string(),
                investor_type: investor_type.to_string(),
                country: country.to_string(),
                date_added: date_added.to_string(),
                last_updated: last_updated.to_string(),
            },
            asset_class: asset_class.to_string(),
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Row of the `/investors` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestorSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub investor_type: String,
    pub country: String,
    pub date_added: String,
    /// Sum of all commitment amounts for this investor
    pub commitments: i64,
}

/// A single commitment as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitmentRecord {
    pub id: i64,
    pub asset_class: String,
    pub currency: String,
    pub amount: i64,
}

/// Body of `/investor/{investor_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestorDetail {
    pub investor_id: i64,
    pub commitments: Vec<CommitmentRecord>,
}

/// Per-asset-class aggregate for one investor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetClassTotal {
    pub asset_class: String,
    pub amount: i64,
    pub count: i64,
}

/// Body of `/investor/{investor_id}/asset-classes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetClassBreakdown {
    pub investor_id: i64,
    pub total: i64,
    pub asset_classes: Vec<AssetClassTotal>,
}

impl AssetClassBreakdown {
    /// Build a breakdown, deriving `total` from the per-class amounts
    pub fn new(investor_id: i64, asset_classes: Vec<AssetClassTotal>) -> Self {
        let total = asset_classes.iter().map(|a| a.amount).sum();
        Self {
            investor_id,
            total,
            asset_classes,
        }
    }
}
