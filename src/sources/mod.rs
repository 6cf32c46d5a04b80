//! Article sources: the live news provider with a built-in fallback.
//!
//! [`NewsSource`] is the only way articles enter the dashboard. It asks the
//! provider for one of three [`FetchMode`]s, normalizes whatever comes back
//! into uniform [`Article`] records, and never fails: when the credential is
//! missing or the provider is unreachable it serves the sample set from
//! [`fallback`] instead, logging why.
//!
//! # Submodules
//!
//! - [`newsapi`]: endpoint URLs and response normalization
//! - [`classify`]: deterministic news/blog classification
//! - [`fallback`]: built-in sample articles

pub mod classify;
pub mod fallback;
pub mod newsapi;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::api::FetchAsync;
use crate::error::{NewsError, Result};
use crate::models::{Article, FilterCriteria, NewsApiResponse};
use newsapi::Endpoint;

/// Category fetches issued at once by [`NewsSource::fetch_many`].
const PARALLEL_FETCHES: usize = 4;

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode {
    /// Top headlines for the configured country.
    Headlines,
    /// Top headlines in one provider category.
    ByCategory(String),
    /// Free-text search across all articles.
    Search(String),
}

impl FetchMode {
    /// Pick the upstream query for the active filters: a category wins over a
    /// search query, and with neither we fetch the headlines.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(category) = non_empty(&criteria.category) {
            FetchMode::ByCategory(category)
        } else if let Some(query) = non_empty(&criteria.query) {
            FetchMode::Search(query)
        } else {
            FetchMode::Headlines
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Headlines => f.write_str("headlines"),
            FetchMode::ByCategory(c) => write!(f, "category:{c}"),
            FetchMode::Search(q) => write!(f, "search:{q}"),
        }
    }
}

/// Where a batch of articles came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOrigin {
    Live,
    /// Sample data substituted because the live fetch failed.
    Fallback { reason: String },
}

/// The articles of one fetch, tagged with their origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleBatch {
    pub articles: Vec<Article>,
    pub origin: BatchOrigin,
}

impl ArticleBatch {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, BatchOrigin::Fallback { .. })
    }
}

/// Fetches and normalizes articles, falling back to sample data on failure.
#[derive(Debug)]
pub struct NewsSource<F> {
    fetcher: F,
    endpoint: Endpoint,
}

impl<F> NewsSource<F>
where
    F: FetchAsync<Response = NewsApiResponse>,
{
    pub fn new(fetcher: F, endpoint: Endpoint) -> Self {
        Self { fetcher, endpoint }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch articles for `mode`. Never fails; see [`NewsSource::fetch_batch`].
    pub async fn fetch_articles(&self, mode: &FetchMode) -> Vec<Article> {
        self.fetch_batch(mode).await.articles
    }

    /// Fetch articles for `mode`, reporting whether they are live or sample data.
    #[instrument(level = "info", skip(self, mode), fields(%mode))]
    pub async fn fetch_batch(&self, mode: &FetchMode) -> ArticleBatch {
        match self.fetch_live(mode).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched live articles");
                ArticleBatch {
                    articles,
                    origin: BatchOrigin::Live,
                }
            }
            Err(e) => {
                match &e {
                    NewsError::MissingCredential => {
                        warn!("NEWS_API_KEY not configured; using sample data")
                    }
                    _ => warn!(error = %e, "Error fetching news; using sample data"),
                }
                let articles = fallback::fallback_for(mode);
                debug!(count = articles.len(), "Serving fallback articles");
                ArticleBatch {
                    articles,
                    origin: BatchOrigin::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    async fn fetch_live(&self, mode: &FetchMode) -> Result<Vec<Article>> {
        let url = self.endpoint.url_for(mode)?;
        let response = self.fetcher.fetch(&url).await?;
        debug!(
            total_results = ?response.total_results,
            received = response.articles.len(),
            "Provider response decoded"
        );
        Ok(newsapi::normalize(&response.articles, mode, Utc::now()))
    }

    /// Fetch several modes concurrently and merge them into one batch.
    ///
    /// Batches are concatenated in the order of `modes`; an article showing
    /// up under more than one mode (same URL and title) is kept once, and ids
    /// are renumbered so they stay unique within the merged batch. The merged
    /// batch counts as fallback if any part was.
    #[instrument(level = "info", skip_all, fields(modes = modes.len()))]
    pub async fn fetch_many(&self, modes: &[FetchMode]) -> ArticleBatch {
        if modes.is_empty() {
            return self.fetch_batch(&FetchMode::Headlines).await;
        }

        let batches: Vec<ArticleBatch> = stream::iter(modes)
            .map(|mode| self.fetch_batch(mode))
            .buffered(PARALLEL_FETCHES)
            .collect()
            .await;

        let origin = batches
            .iter()
            .find(|b| b.is_fallback())
            .map(|b| b.origin.clone())
            .unwrap_or(BatchOrigin::Live);

        let articles: Vec<Article> = batches
            .into_iter()
            .flat_map(|b| b.articles)
            .unique_by(|a| (a.url.clone(), a.title.clone()))
            .enumerate()
            .map(|(index, mut article)| {
                article.id = index.to_string();
                article
            })
            .collect();

        info!(count = articles.len(), "Merged article batches");
        ArticleBatch { articles, origin }
    }
}
