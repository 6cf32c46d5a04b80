//! Delimited-text export of payout tables.
//!
//! # Format
//!
//! ```text
//! Author,News Articles,Blog Posts,Total Articles,News Payout ($),Blog Payout ($),Total Payout ($)
//! Jane Smith,1,0,1,50.00,0.00,50.00
//! ```
//!
//! Rows are separated by `\n` with no trailing newline. A field containing a
//! comma, a double quote or a line break is quoted RFC 4180 style.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::AuthorPayout;
use crate::utils::{format_money, report_file_name};

pub const HEADER: &str = "Author,News Articles,Blog Posts,Total Articles,News Payout ($),Blog Payout ($),Total Payout ($)";

/// Render payout rows as delimited text, or `None` when there is nothing to
/// export.
pub fn to_delimited_text(rows: &[AuthorPayout]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let lines = rows.iter().map(|row| {
        [
            escape_field(&row.author),
            Cow::Owned(row.news_count.to_string()),
            Cow::Owned(row.blog_count.to_string()),
            Cow::Owned(row.total_articles.to_string()),
            Cow::Owned(format_money(row.news_payout)),
            Cow::Owned(format_money(row.blog_payout)),
            Cow::Owned(format_money(row.total_payout)),
        ]
        .join(",")
    });
    Some(std::iter::once(HEADER.to_string()).chain(lines).collect::<Vec<_>>().join("\n"))
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write `payout-report-<date>.csv` into `dir`.
///
/// # Arguments
///
/// * `dir` - Output directory, created if missing
/// * `date` - Report date used in the file name
/// * `rows` - Payout rows in display order
///
/// # Returns
///
/// The written path, or `Ok(None)` without touching the disk when `rows`
/// is empty.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), rows = rows.len()))]
pub async fn write_report(
    dir: &Path,
    date: NaiveDate,
    rows: &[AuthorPayout],
) -> Result<Option<PathBuf>> {
    let Some(text) = to_delimited_text(rows) else {
        info!("No payout rows; skipping CSV export");
        return Ok(None);
    };
    fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(date, "csv"));
    fs::write(&path, text).await?;
    info!(path = %path.display(), "Wrote CSV payout report");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(author: &str, news: usize, blog: usize) -> AuthorPayout {
        let news_payout = news as f64 * 50.0;
        let blog_payout = blog as f64 * 75.0;
        AuthorPayout {
            author: author.to_string(),
            news_count: news,
            blog_count: blog,
            total_articles: news + blog,
            news_payout,
            blog_payout,
            total_payout: news_payout + blog_payout,
        }
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(to_delimited_text(&[]), None);
    }

    #[test]
    fn test_single_row() {
        let text = to_delimited_text(&[row("Jane Smith", 1, 0)]).unwrap();
        assert_eq!(
            text,
            format!("{HEADER}\nJane Smith,1,0,1,50.00,0.00,50.00")
        );
    }

    #[test]
    fn test_line_count_and_order() {
        let rows = vec![row("A", 1, 1), row("B", 1, 0), row("C", 0, 2)];
        let text = to_delimited_text(&rows).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "A,1,1,2,50.00,75.00,125.00");
        assert!(lines[3].starts_with("C,"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let text = to_delimited_text(&[row("Smith, Jane \"JS\"", 1, 0)]).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "\"Smith, Jane \"\"JS\"\"\",1,0,1,50.00,0.00,50.00");

        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_fractional_amounts() {
        let mut r = row("A", 3, 0);
        r.news_payout = 3.0 * 12.5;
        r.total_payout = r.news_payout;
        let text = to_delimited_text(&[r]).unwrap();
        assert!(text.ends_with("A,3,0,3,37.50,0.00,37.50"));
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();

        let path = write_report(dir.path(), date, &[row("A", 1, 0)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "payout-report-2025-05-06.csv");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(HEADER));
    }

    #[tokio::test]
    async fn test_write_report_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();

        assert!(write_report(dir.path(), date, &[]).await.unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
