//! Request building and response normalization for the news provider.
//!
//! # Endpoints
//!
//! | Mode | Path | Parameters |
//! |------|------|------------|
//! | headlines | `top-headlines` | `country` |
//! | by category | `top-headlines` | `country`, `category` |
//! | search | `everything` | `q` |
//!
//! Every request carries the credential as `apiKey`.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use super::FetchMode;
use super::classify::classify;
use crate::config::NewsConfig;
use crate::error::{NewsError, Result};
use crate::models::{Article, RawArticle, UNKNOWN_AUTHOR};

/// Where and as whom to ask the provider.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    country: String,
    api_key: Option<String>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, country: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            country: country.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_config(config: &NewsConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.country.clone(),
            config.api_key().map(str::to_string),
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full request URL for `mode`. Fails without a credential.
    pub fn url_for(&self, mode: &FetchMode) -> Result<Url> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::MissingCredential)?;
        let base = self.base_url.trim_end_matches('/');

        let (path, mut params): (&str, Vec<(&str, &str)>) = match mode {
            FetchMode::Headlines => ("top-headlines", vec![("country", self.country.as_str())]),
            FetchMode::ByCategory(category) => (
                "top-headlines",
                vec![("country", self.country.as_str()), ("category", category.as_str())],
            ),
            FetchMode::Search(query) => ("everything", vec![("q", query.as_str())]),
        };
        params.push(("apiKey", api_key));

        Ok(Url::parse_with_params(&format!("{base}/{path}"), params)?)
    }
}

/// Turn raw provider items into [`Article`]s.
///
/// Missing, null or empty fields get placeholder values; `now` stands in for
/// a missing publication time. Ids are positions within this batch.
pub fn normalize(raw: &[RawArticle], mode: &FetchMode, now: DateTime<Utc>) -> Vec<Article> {
    let fetched_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    raw.iter()
        .enumerate()
        .map(|(index, item)| Article {
            id: index.to_string(),
            title: or_default(item.title.as_deref(), "Untitled"),
            description: or_default(item.description.as_deref(), "No description available"),
            author: or_default(item.author.as_deref(), UNKNOWN_AUTHOR),
            published_at: or_default(item.published_at.as_deref(), &fetched_at),
            source: or_default(
                item.source.as_ref().and_then(|s| s.name.as_deref()),
                "Unknown Source",
            ),
            kind: classify(item, mode),
            url: or_default(item.url.as_deref(), "#"),
        })
        .collect()
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleType, RawSource};
    use chrono::TimeZone;

    fn endpoint() -> Endpoint {
        Endpoint::new("https://newsapi.org/v2/", "us", Some("secret".to_string()))
    }

    #[test]
    fn test_headlines_url() {
        let url = endpoint().url_for(&FetchMode::Headlines).unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?country=us&apiKey=secret"
        );
    }

    #[test]
    fn test_category_url() {
        let url = endpoint()
            .url_for(&FetchMode::ByCategory("technology".to_string()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?country=us&category=technology&apiKey=secret"
        );
    }

    #[test]
    fn test_search_url_is_encoded() {
        let url = endpoint()
            .url_for(&FetchMode::Search("rust & go".to_string()))
            .unwrap();
        assert!(url.as_str().starts_with("https://newsapi.org/v2/everything?q=rust+%26+go"));
        let q = url.query_pairs().find(|(k, _)| k == "q").unwrap().1;
        assert_eq!(q, "rust & go");
    }

    #[test]
    fn test_missing_credential() {
        let endpoint = Endpoint::new("https://newsapi.org/v2", "us", None);
        assert!(!endpoint.has_credential());
        assert!(matches!(
            endpoint.url_for(&FetchMode::Headlines),
            Err(NewsError::MissingCredential)
        ));

        let blank = Endpoint::new("https://newsapi.org/v2", "us", Some("  ".to_string()));
        assert!(!blank.has_credential());
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let raw = vec![
            RawArticle {
                author: Some(String::new()),
                ..Default::default()
            },
            RawArticle {
                source: Some(RawSource {
                    name: Some("Wire".to_string()),
                }),
                author: Some("Ann Lee".to_string()),
                title: Some("Storm".to_string()),
                description: Some("Rain".to_string()),
                url: Some("https://example.com/storm".to_string()),
                published_at: Some("2024-05-30T08:00:00Z".to_string()),
                kind: None,
            },
        ];

        let articles = normalize(&raw, &FetchMode::Headlines, now);
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.id, "0");
        assert_eq!(first.title, "Untitled");
        assert_eq!(first.description, "No description available");
        assert_eq!(first.author, UNKNOWN_AUTHOR);
        assert_eq!(first.source, "Unknown Source");
        assert_eq!(first.url, "#");
        assert_eq!(first.published_at, "2024-06-01T12:00:00.000Z");
        assert_eq!(first.kind, ArticleType::News);

        let second = &articles[1];
        assert_eq!(second.id, "1");
        assert_eq!(second.author, "Ann Lee");
        assert_eq!(second.source, "Wire");
        assert_eq!(second.published_at, "2024-05-30T08:00:00Z");
    }

    #[test]
    fn test_normalize_uses_category_rule() {
        let raw = vec![RawArticle::default(), RawArticle::default()];
        let articles = normalize(&raw, &FetchMode::ByCategory("science".to_string()), Utc::now());
        assert!(articles.iter().all(|a| a.kind == ArticleType::Blog));
    }
}
