//! Per-author payout aggregation.
//!
//! Articles are grouped by the literal `author` string (no case or whitespace
//! normalization, and the `"Unknown Author"` sentinel is a group like any
//! other). Groups come out in order of first appearance, so the result is
//! reproducible for a given input; sorting is left to consumers through
//! [`sort_payouts`].

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Article, ArticleType, AuthorPayout, PayoutRateConfig};

/// Group `articles` by author and price them with `rates`.
///
/// Every row satisfies `total_articles = news_count + blog_count`,
/// `news_payout = news_count * news_rate`, `blog_payout = blog_count * blog_rate`
/// and `total_payout = news_payout + blog_payout`.
pub fn compute_payouts(articles: &[Article], rates: &PayoutRateConfig) -> Vec<AuthorPayout> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for article in articles {
        let entry = counts.entry(article.author.as_str()).or_insert_with(|| {
            order.push(article.author.as_str());
            (0, 0)
        });
        match article.kind {
            ArticleType::News => entry.0 += 1,
            ArticleType::Blog => entry.1 += 1,
        }
    }

    order
        .into_iter()
        .map(|author| {
            let (news_count, blog_count) = counts[author];
            author_payout(author, news_count, blog_count, rates)
        })
        .collect()
}

fn author_payout(
    author: &str,
    news_count: usize,
    blog_count: usize,
    rates: &PayoutRateConfig,
) -> AuthorPayout {
    let news_payout = news_count as f64 * rates.rate_for(ArticleType::News);
    let blog_payout = blog_count as f64 * rates.rate_for(ArticleType::Blog);
    AuthorPayout {
        author: author.to_string(),
        news_count,
        blog_count,
        total_articles: news_count + blog_count,
        news_payout,
        blog_payout,
        total_payout: news_payout + blog_payout,
    }
}

/// Dataset-wide totals shown next to the rate inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSummary {
    pub news_count: usize,
    pub blog_count: usize,
    pub total_articles: usize,
    pub news_payout: f64,
    pub blog_payout: f64,
    pub total_payout: f64,
}

impl PayoutSummary {
    pub fn from_articles(articles: &[Article], rates: &PayoutRateConfig) -> Self {
        let news_count = articles
            .iter()
            .filter(|a| a.kind == ArticleType::News)
            .count();
        let blog_count = articles.len() - news_count;
        let row = author_payout("", news_count, blog_count, rates);
        Self {
            news_count,
            blog_count,
            total_articles: row.total_articles,
            news_payout: row.news_payout,
            blog_payout: row.blog_payout,
            total_payout: row.total_payout,
        }
    }
}

/// Orderings a payout table can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayoutSort {
    /// As produced by [`compute_payouts`].
    #[default]
    FirstSeen,
    /// Alphabetical by author.
    Author,
    /// Highest total payout first; ties keep first-seen order.
    TotalDesc,
}

pub fn sort_payouts(rows: &mut [AuthorPayout], sort: PayoutSort) {
    match sort {
        PayoutSort::FirstSeen => {}
        PayoutSort::Author => rows.sort_by(|a, b| a.author.cmp(&b.author)),
        PayoutSort::TotalDesc => rows.sort_by(|a, b| {
            b.total_payout
                .partial_cmp(&a.total_payout)
                .unwrap_or(Ordering::Equal)
        }),
    }
}
