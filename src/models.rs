//! Data models for articles, filter criteria, payout rates and payout rows.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: a normalized news or blog record, one per upstream item
//! - [`FilterCriteria`]: the active filter constraints for a list view
//! - [`PayoutRateConfig`]: per-type unit prices, persisted between sessions
//! - [`AuthorPayout`]: derived per-author counts and amounts
//! - Upstream wire types: [`NewsApiResponse`], [`RawArticle`], [`RawSource`]
//!
//! Serialized field names use camelCase so persisted settings and JSON
//! reports keep the `newsRate` / `publishedAt` shape the dashboard has always
//! written.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NewsError;

/// Author value used when the provider does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Content type of an article. Payout rates are set per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    News,
    Blog,
}

impl ArticleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleType::News => "news",
            ArticleType::Blog => "blog",
        }
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is neither `news` nor `blog`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown article type `{0}` (expected `news` or `blog`)")]
pub struct UnknownArticleType(pub String);

impl FromStr for ArticleType {
    type Err = UnknownArticleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(ArticleType::News),
            "blog" => Ok(ArticleType::Blog),
            _ => Err(UnknownArticleType(s.to_string())),
        }
    }
}

/// A single news or blog record as the rest of the dashboard sees it.
///
/// Every field is populated: the source adapter substitutes defaults for
/// anything the provider leaves out, so consumers never deal with nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Position within the fetch batch. Not stable across fetches.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display name, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    /// ISO-8601 timestamp as delivered by the provider.
    pub published_at: String,
    /// Publisher name.
    pub source: String,
    #[serde(rename = "type")]
    pub kind: ArticleType,
    pub url: String,
}

impl Article {
    /// Publication instant, if `published_at` parses.
    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.published_at)
    }

    /// UTC calendar date of publication, if `published_at` parses.
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published_at_utc().map(|dt| dt.date_naive())
    }
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// One end of a date-range filter.
///
/// Filter input arrives as text from query parameters or flags. Input that
/// does not parse is kept as `Malformed` so the predicate can reject every
/// article instead of silently dropping the constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    On(NaiveDate),
    Malformed(String),
}

impl DateBound {
    /// Accepts `YYYY-MM-DD` or a full timestamp (reduced to its UTC date).
    pub fn parse(raw: &str) -> Self {
        match parse_timestamp(raw) {
            Some(dt) => DateBound::On(dt.date_naive()),
            None => DateBound::Malformed(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateBound::On(d) => Some(*d),
            DateBound::Malformed(_) => None,
        }
    }
}

impl From<NaiveDate> for DateBound {
    fn from(date: NaiveDate) -> Self {
        DateBound::On(date)
    }
}

/// Active filter constraints. `None` means "no constraint on this dimension".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Exact author match.
    pub author: Option<String>,
    /// Exact content-type match.
    pub kind: Option<ArticleType>,
    /// Provider category. Selects the fetch mode; articles carry no category
    /// so it is not an article predicate.
    pub category: Option<String>,
    /// Inclusive lower bound on the publication date.
    pub from_date: Option<DateBound>,
    /// Inclusive upper bound on the publication date.
    pub to_date: Option<DateBound>,
    /// Case-insensitive substring of title, description or author.
    pub query: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

/// Unit price per article of each type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRateConfig {
    pub news_rate: f64,
    pub blog_rate: f64,
}

impl Default for PayoutRateConfig {
    fn default() -> Self {
        Self {
            news_rate: 50.0,
            blog_rate: 75.0,
        }
    }
}

impl PayoutRateConfig {
    pub fn rate_for(&self, kind: ArticleType) -> f64 {
        match kind {
            ArticleType::News => self.news_rate,
            ArticleType::Blog => self.blog_rate,
        }
    }

    /// Rates must be finite and non-negative.
    pub fn validate(&self) -> Result<(), NewsError> {
        for (name, value) in [("news", self.news_rate), ("blog", self.blog_rate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NewsError::InvalidRate { name, value });
            }
        }
        Ok(())
    }
}

/// Per-author counts and payouts derived from an article list.
///
/// Always recomputed from articles and rates; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayout {
    pub author: String,
    pub news_count: usize,
    pub blog_count: usize,
    pub total_articles: usize,
    pub news_payout: f64,
    pub blog_payout: f64,
    pub total_payout: f64,
}

/// A `{name, value}` pair for grouped-count views and charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub value: usize,
}

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
}

/// Top-level response body of the news provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// An article exactly as the provider sends it. Any field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    /// Explicit content type, when a provider supplies one.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}
