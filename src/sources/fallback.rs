//! Built-in sample articles served when the live provider is unavailable.

use super::FetchMode;
use crate::models::{Article, ArticleType};

struct Sample {
    title: &'static str,
    description: &'static str,
    author: &'static str,
    published_at: &'static str,
    source: &'static str,
    kind: ArticleType,
    url: &'static str,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        title: "New Breakthrough in Renewable Energy",
        description: "Scientists discover a new method for efficient solar energy conversion.",
        author: "Jane Smith",
        published_at: "2023-03-15T10:30:00Z",
        source: "Science Daily",
        kind: ArticleType::News,
        url: "https://example.com/news/1",
    },
    Sample {
        title: "The Future of AI in Healthcare",
        description: "How artificial intelligence is transforming medical diagnostics and treatment.",
        author: "John Doe",
        published_at: "2023-03-14T08:45:00Z",
        source: "Tech Insights",
        kind: ArticleType::Blog,
        url: "https://example.com/blog/2",
    },
    Sample {
        title: "Global Markets React to Economic Policy Changes",
        description: "Stock markets worldwide show volatility following new economic policies.",
        author: "Michael Johnson",
        published_at: "2023-03-13T14:20:00Z",
        source: "Financial Times",
        kind: ArticleType::News,
        url: "https://example.com/news/3",
    },
    Sample {
        title: "5 Tips for Remote Work Productivity",
        description: "Expert advice on staying productive while working from home.",
        author: "Sarah Williams",
        published_at: "2023-03-12T11:15:00Z",
        source: "Work Lifestyle",
        kind: ArticleType::Blog,
        url: "https://example.com/blog/4",
    },
    Sample {
        title: "New Study Links Diet to Mental Health",
        description: "Research shows strong correlation between nutrition and psychological wellbeing.",
        author: "David Chen",
        published_at: "2023-03-11T09:30:00Z",
        source: "Health Journal",
        kind: ArticleType::News,
        url: "https://example.com/news/5",
    },
];

/// The full sample set, ids `"1"` through `"5"`.
pub fn sample_articles() -> Vec<Article> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, s)| Article {
            id: (i + 1).to_string(),
            title: s.title.to_string(),
            description: s.description.to_string(),
            author: s.author.to_string(),
            published_at: s.published_at.to_string(),
            source: s.source.to_string(),
            kind: s.kind,
            url: s.url.to_string(),
        })
        .collect()
}

/// Sample articles appropriate for `mode`.
///
/// Search narrows the set to items whose title or description contains the
/// query, ignoring case; the other modes get every sample.
pub fn fallback_for(mode: &FetchMode) -> Vec<Article> {
    let articles = sample_articles();
    match mode {
        FetchMode::Search(query) => {
            let needle = query.to_lowercase();
            articles
                .into_iter()
                .filter(|a| {
                    a.title.to_lowercase().contains(&needle)
                        || a.description.to_lowercase().contains(&needle)
                })
                .collect()
        }
        FetchMode::Headlines | FetchMode::ByCategory(_) => articles,
    }
}
