//! Utility functions for logging, file naming and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging upstream error bodies
//! - Credential redaction for request URLs
//! - JSON error detection for responses cut off mid-stream
//! - Report file naming and output directory validation

use chrono::NaiveDate;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::error::Result;

/// Truncate a string for logging purposes.
///
/// # Arguments
///
/// * `s` - The string to truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The string unchanged if it fits, otherwise the first `max` characters
/// followed by an ellipsis and the number of dropped bytes.
///
/// # Example
///
/// ```ignore
/// assert_eq!(truncate_for_log("abcdef", 3), "abc…(+3 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Render a request URL for logs with the `apiKey` parameter masked.
pub fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Name of a dated report file, e.g. `payout-report-2025-05-06.csv`.
pub fn report_file_name(date: NaiveDate, extension: &str) -> String {
    format!("payout-report-{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Format a money amount with two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Ensure a directory exists and is writable.
///
/// # Arguments
///
/// * `path` - Directory that report files will be written into
///
/// # Returns
///
/// `Ok(())` once the directory exists and a scratch file could be created
/// and removed in it.
///
/// # Errors
///
/// Any I/O error from creating the directory or the scratch file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    let scratch = path.join("..__write_check__");
    stdfs::File::create(&scratch)?;
    let _ = stdfs::remove_file(&scratch);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "ééééé";
        assert_eq!(truncate_for_log(s, 2), "éé…(+6 bytes)");
    }

    #[test]
    fn test_redact_api_key() {
        let url = Url::parse("https://newsapi.org/v2/top-headlines?country=us&apiKey=secret")
            .unwrap();
        let redacted = redact_api_key(&url);
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("apiKey=***") || redacted.contains("apiKey=%2A%2A%2A"));
        assert!(redacted.contains("country=us"));
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        assert_eq!(report_file_name(date, "csv"), "payout-report-2025-05-06.csv");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(50.0), "50.00");
        assert_eq!(format_money(12.346), "12.35");
        assert_eq!(format_money(0.0), "0.00");
    }

    #[test]
    fn test_looks_truncated() {
        let json_eof = r#"{"field": "value"#;
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str(json_eof);
        if let Err(e) = result {
            assert!(looks_truncated(&e));
        }
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports/2025");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__write_check__").exists());
    }
}
