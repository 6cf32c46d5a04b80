//! Interactive session state.
//!
//! [`SessionState`] is an immutable value: every user action produces a new
//! state instead of editing the current one. [`LatestOnly`] makes sure that
//! when several loads overlap, only the most recently issued one is allowed
//! to land. [`Dashboard`] ties both to an article source and a settings store.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

use crate::api::FetchAsync;
use crate::error::Result;
use crate::filter::apply_filters;
use crate::models::{Article, AuthorPayout, FilterCriteria, NewsApiResponse, Page, PayoutRateConfig};
use crate::payouts::compute_payouts;
use crate::projection::{clamp_page, paginate};
use crate::sources::{ArticleBatch, FetchMode, NewsSource};
use crate::store::{KeyValueStore, load_rates, save_rates};

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub criteria: FilterCriteria,
    pub rates: PayoutRateConfig,
    /// 1-based page of the article list.
    pub page: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(PayoutRateConfig::default())
    }
}

impl SessionState {
    pub fn new(rates: PayoutRateConfig) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            rates,
            page: 1,
        }
    }

    /// New filters always start back on the first page.
    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_rates(&self, rates: PayoutRateConfig) -> Self {
        Self {
            rates,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

/// Ticket counter that discards results of superseded requests.
#[derive(Debug, Default)]
pub struct LatestOnly {
    issued: AtomicU64,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; every earlier ticket becomes stale.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }

    /// Await `fut` under a fresh ticket. Returns `None` if another request
    /// was issued while it was in flight.
    pub async fn run<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        let ticket = self.issue();
        let output = fut.await;
        if self.is_latest(ticket) {
            Some(output)
        } else {
            debug!(ticket, "Discarding superseded result");
            None
        }
    }
}

/// One user's dashboard: article loading, filters, paging and payout rates.
#[derive(Debug)]
pub struct Dashboard<F, S> {
    source: NewsSource<F>,
    store: S,
    gate: LatestOnly,
    state: SessionState,
}

impl<F, S> Dashboard<F, S>
where
    F: FetchAsync<Response = NewsApiResponse>,
    S: KeyValueStore,
{
    /// Start a session with the rates saved in `store`.
    pub fn open(source: NewsSource<F>, store: S) -> Self {
        let rates = load_rates(&store);
        info!(news_rate = rates.news_rate, blog_rate = rates.blog_rate, "Dashboard opened");
        Self {
            source,
            store,
            gate: LatestOnly::new(),
            state: SessionState::new(rates),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn source(&self) -> &NewsSource<F> {
        &self.source
    }

    pub fn apply_criteria(&mut self, criteria: FilterCriteria) -> &SessionState {
        self.state = self.state.with_criteria(criteria);
        &self.state
    }

    pub fn go_to_page(&mut self, page: usize) -> &SessionState {
        self.state = self.state.with_page(page);
        &self.state
    }

    /// Validate, persist, then adopt new rates. On error the session keeps
    /// its previous rates.
    #[instrument(level = "info", skip(self))]
    pub fn set_rates(&mut self, rates: PayoutRateConfig) -> Result<&SessionState> {
        rates.validate()?;
        save_rates(&self.store, &rates)?;
        self.state = self.state.with_rates(rates);
        Ok(&self.state)
    }

    /// Fetch articles for `mode`. `None` means a newer load was started
    /// before this one finished and its result should be ignored.
    pub async fn load(&self, mode: &FetchMode) -> Option<ArticleBatch> {
        let batch = self.gate.run(self.source.fetch_batch(mode)).await;
        if batch.is_none() {
            warn!(%mode, "Load superseded by a newer request");
        }
        batch
    }

    /// Fetch articles for the current filters.
    pub async fn load_current(&self) -> Option<ArticleBatch> {
        self.load(&FetchMode::from_criteria(&self.state.criteria)).await
    }

    /// The current page of filtered articles. A page past the end shows the
    /// last page instead.
    pub fn news_page(&self, articles: &[Article], page_size: usize) -> Page<Article> {
        let filtered = apply_filters(articles, &self.state.criteria);
        let total_pages = filtered.len().div_ceil(page_size.max(1));
        let page = clamp_page(self.state.page, total_pages);
        paginate(&filtered, page_size, page)
    }

    /// Payouts for the filtered articles at the current rates.
    pub fn payout_rows(&self, articles: &[Article]) -> Vec<AuthorPayout> {
        let filtered = apply_filters(articles, &self.state.criteria);
        compute_payouts(&filtered, &self.state.rates)
    }
}
