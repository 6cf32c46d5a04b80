//! Output generation: report files and terminal tables.
//!
//! # Submodules
//!
//! - [`csv`]: delimited-text payout export
//! - [`json`]: JSON payout report with rates and summary
//! - [`table`]: plain-text tables for the terminal
//!
//! # Output Structure
//!
//! ```text
//! export_dir/
//! ├── payout-report-2025-05-06.csv
//! └── payout-report-2025-05-06.json
//! ```

pub mod csv;
pub mod json;
pub mod table;

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::utils::ensure_writable_dir;
use json::PayoutReport;

/// Write `report` into `dir` in the requested format.
///
/// # Arguments
///
/// * `dir` - Output directory, created if missing
/// * `format` - CSV table or full JSON report
/// * `report` - Payout rows, rates and totals for the report date
///
/// # Returns
///
/// The written path, or `Ok(None)` when there are no payout rows. In that
/// case `dir` is left untouched.
pub async fn export_report(
    dir: &Path,
    format: ExportFormat,
    report: &PayoutReport<'_>,
) -> Result<Option<PathBuf>> {
    if report.payouts.is_empty() {
        info!(dir = %dir.display(), "Nothing to export");
        return Ok(None);
    }
    if let Err(e) = ensure_writable_dir(dir).await {
        error!(
            path = %dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }
    match format {
        ExportFormat::Csv => csv::write_report(dir, report.generated_on, report.payouts).await,
        ExportFormat::Json => json::write_report(dir, report).await,
    }
}
