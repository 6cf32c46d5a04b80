//! JSON payout report.
//!
//! The report bundles the rates in effect, the per-author rows and the
//! dataset-wide summary so a reader can check every amount:
//!
//! ```json
//! {
//!   "generatedOn": "2025-05-06",
//!   "rates": { "newsRate": 50.0, "blogRate": 75.0 },
//!   "payouts": [ { "author": "Jane Smith", "newsCount": 1, ... } ],
//!   "summary": { "newsCount": 1, ... }
//! }
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::{AuthorPayout, PayoutRateConfig};
use crate::payouts::PayoutSummary;
use crate::utils::report_file_name;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReport<'a> {
    pub generated_on: NaiveDate,
    pub rates: PayoutRateConfig,
    pub payouts: &'a [AuthorPayout],
    pub summary: PayoutSummary,
}

/// Write `payout-report-<date>.json` into `dir`.
///
/// Like the CSV export, an empty payout table writes nothing and returns
/// `Ok(None)`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn write_report(dir: &Path, report: &PayoutReport<'_>) -> Result<Option<PathBuf>> {
    if report.payouts.is_empty() {
        info!("No payout rows; skipping JSON export");
        return Ok(None);
    }
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = fs::create_dir_all(dir).await {
        error!(error = %e, "Failed to create report dir");
        return Err(e.into());
    }
    let path = dir.join(report_file_name(report.generated_on, "json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON payout report");
    Ok(Some(path))
}
