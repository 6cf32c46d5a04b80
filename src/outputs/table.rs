//! Plain-text tables for terminal output.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::models::{Article, AuthorPayout, CountEntry, PayoutRateConfig};
use crate::payouts::PayoutSummary;
use crate::projection::{DashboardStats, relative_age};
use crate::utils::format_money;

const TITLE_WIDTH: usize = 48;

/// A fixed set of columns, padded to the widest cell.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    right_aligned: Vec<bool>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let right_aligned = vec![false; headers.len()];
        Self {
            headers,
            rows: Vec::new(),
            right_aligned,
        }
    }

    /// Right-align the given columns (numbers).
    pub fn right_align(mut self, columns: &[usize]) -> Self {
        for &c in columns {
            if let Some(flag) = self.right_aligned.get_mut(c) {
                *flag = true;
            }
        }
        self
    }

    /// Append a row; missing cells render empty and extra cells are dropped.
    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = widths[i].saturating_sub(cell.chars().count());
            if self.right_aligned[i] {
                line.extend(std::iter::repeat_n(' ', pad));
                line.push_str(cell);
            } else {
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', pad));
            }
        }
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        self.write_row(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.write_row(f, &rule, &widths)?;
        for row in &self.rows {
            self.write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn articles_table(articles: &[Article], now: DateTime<Utc>) -> Table {
    let mut table = Table::new(["ID", "Title", "Author", "Type", "Source", "Published"]);
    for a in articles {
        table.push([
            a.id.clone(),
            clip(&a.title, TITLE_WIDTH),
            a.author.clone(),
            a.kind.to_string(),
            a.source.clone(),
            relative_age(&a.published_at, now),
        ]);
    }
    table
}

pub fn payouts_table(rows: &[AuthorPayout]) -> Table {
    let mut table = Table::new([
        "Author",
        "News",
        "Blogs",
        "Total",
        "News Payout ($)",
        "Blog Payout ($)",
        "Total Payout ($)",
    ])
    .right_align(&[1, 2, 3, 4, 5, 6]);
    for row in rows {
        table.push([
            row.author.clone(),
            row.news_count.to_string(),
            row.blog_count.to_string(),
            row.total_articles.to_string(),
            format_money(row.news_payout),
            format_money(row.blog_payout),
            format_money(row.total_payout),
        ]);
    }
    table
}

pub fn counts_table(label: &str, groups: &[CountEntry]) -> Table {
    let mut table = Table::new([label, "Articles"]).right_align(&[1]);
    for g in groups {
        table.push([g.name.clone(), g.value.to_string()]);
    }
    table
}

/// Rates and dataset totals, one `key: value` per line.
pub fn summary_block(rates: &PayoutRateConfig, summary: &PayoutSummary) -> String {
    [
        format!("News rate:    ${} per article", format_money(rates.news_rate)),
        format!("Blog rate:    ${} per post", format_money(rates.blog_rate)),
        format!(
            "Articles:     {} ({} news, {} blog)",
            summary.total_articles, summary.news_count, summary.blog_count
        ),
        format!("News payout:  ${}", format_money(summary.news_payout)),
        format!("Blog payout:  ${}", format_money(summary.blog_payout)),
        format!("Total payout: ${}", format_money(summary.total_payout)),
    ]
    .join("\n")
}

pub fn stats_block(stats: &DashboardStats) -> String {
    [
        format!("Total articles: {}", stats.total_articles),
        format!("Authors:        {}", stats.unique_authors),
        format!("News:           {} ({}%)", stats.news_count, stats.news_percentage),
        format!("Blogs:          {} ({}%)", stats.blog_count, stats.blog_percentage),
    ]
    .join("\n")
}
