//! Read-only projections of article and payout lists for display.
//!
//! Nothing here mutates its input; every function returns a fresh view.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Article, ArticleType, CountEntry, Page, UNKNOWN_AUTHOR, parse_timestamp};

/// Slice out page `page_number` (1-based) of `items`.
///
/// `total_pages` is `ceil(len / page_size)`, and 0 for an empty list. Pages
/// outside `1..=total_pages` come back empty. A `page_size` of 0 is treated
/// as 1.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page_number: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let start = page_number.saturating_sub(1).saturating_mul(page_size);

    let items = if page_number == 0 || start >= items.len() {
        Vec::new()
    } else {
        let end = (start + page_size).min(items.len());
        items[start..end].to_vec()
    };
    Page { items, total_pages }
}

/// Map a requested page into `1..=total_pages`, or 1 when there are no pages.
pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.clamp(1, total_pages.max(1))
}

/// Field an article list can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Author,
    Type,
    Source,
}

impl Dimension {
    fn key<'a>(&self, article: &'a Article) -> &'a str {
        match self {
            Dimension::Author => &article.author,
            Dimension::Type => article.kind.as_str(),
            Dimension::Source => &article.source,
        }
    }
}

/// Count articles per distinct value of `dimension`, in first-seen order.
/// Empty values are counted under `"Unknown"`.
pub fn group_by(articles: &[Article], dimension: Dimension) -> Vec<CountEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CountEntry> = Vec::new();

    for article in articles {
        let key = match dimension.key(article) {
            "" => "Unknown",
            k => k,
        };
        match index.get(key) {
            Some(&i) => groups[i].value += 1,
            None => {
                index.insert(key, groups.len());
                groups.push(CountEntry {
                    name: key.to_string(),
                    value: 1,
                });
            }
        }
    }
    groups
}

/// The `n` largest groups, largest first. Equal counts keep their order.
pub fn top_n(mut groups: Vec<CountEntry>, n: usize) -> Vec<CountEntry> {
    groups.sort_by(|a, b| b.value.cmp(&a.value));
    groups.truncate(n);
    groups
}

/// Headline numbers for the overview screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: usize,
    pub unique_authors: usize,
    pub news_count: usize,
    pub blog_count: usize,
    /// Rounded share of news articles, 0 to 100.
    pub news_percentage: u32,
    pub blog_percentage: u32,
}

impl DashboardStats {
    pub fn from_articles(articles: &[Article]) -> Self {
        let total_articles = articles.len();
        let news_count = articles
            .iter()
            .filter(|a| a.kind == ArticleType::News)
            .count();
        let blog_count = total_articles - news_count;
        let unique_authors = articles.iter().map(|a| a.author.as_str()).unique().count();

        Self {
            total_articles,
            unique_authors,
            news_count,
            blog_count,
            news_percentage: percentage(news_count, total_articles),
            blog_percentage: percentage(blog_count, total_articles),
        }
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}

/// Distinct named authors in first-seen order, for the author filter.
pub fn unique_authors(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|a| a.author.as_str())
        .filter(|a| *a != UNKNOWN_AUTHOR && !a.is_empty())
        .unique()
        .map(str::to_string)
        .collect()
}

/// The first `n` articles.
pub fn recent(articles: &[Article], n: usize) -> &[Article] {
    &articles[..n.min(articles.len())]
}

/// Human-readable age of a publication timestamp relative to `now`.
pub fn relative_age(published_at: &str, now: DateTime<Utc>) -> String {
    let Some(published) = parse_timestamp(published_at) else {
        return "recently".to_string();
    };
    let elapsed = now.signed_duration_since(published);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };

    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        plural(elapsed.num_hours(), "hour")
    } else {
        plural(elapsed.num_days(), "day")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(author: &str, kind: ArticleType, source: &str) -> Article {
        Article {
            id: String::new(),
            title: "t".to_string(),
            description: "d".to_string(),
            author: author.to_string(),
            published_at: "2023-03-15T10:30:00Z".to_string(),
            source: source.to_string(),
            kind,
            url: "#".to_string(),
        }
    }

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate(&numbers(23), 10, 3);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let input = numbers(23);
        let total = paginate(&input, 10, 1).total_pages;
        let joined: Vec<usize> = (1..=total)
            .flat_map(|p| paginate(&input, 10, p).items)
            .collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn test_empty_and_out_of_range() {
        let empty: Vec<usize> = Vec::new();
        let page = paginate(&empty, 10, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);

        let page = paginate(&numbers(5), 10, 4);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        assert!(paginate(&numbers(5), 10, 0).items.is_empty());
    }

    #[test]
    fn test_exact_multiple_and_zero_page_size() {
        assert_eq!(paginate(&numbers(20), 10, 2).total_pages, 2);
        let page = paginate(&numbers(3), 0, 2);
        assert_eq!(page.items, vec![2]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_group_by_first_seen() {
        let input = vec![
            article("B", ArticleType::News, "Wire"),
            article("A", ArticleType::Blog, ""),
            article("B", ArticleType::Blog, "Wire"),
        ];
        assert_eq!(
            group_by(&input, Dimension::Author),
            vec![
                CountEntry { name: "B".to_string(), value: 2 },
                CountEntry { name: "A".to_string(), value: 1 },
            ]
        );
        let types: Vec<String> = group_by(&input, Dimension::Type)
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(types, vec!["news", "blog"]);
        let sources = group_by(&input, Dimension::Source);
        assert_eq!(sources[1].name, "Unknown");
    }

    #[test]
    fn test_top_n_is_stable() {
        let groups = vec![
            CountEntry { name: "a".to_string(), value: 1 },
            CountEntry { name: "b".to_string(), value: 3 },
            CountEntry { name: "c".to_string(), value: 1 },
            CountEntry { name: "d".to_string(), value: 2 },
        ];
        let names: Vec<String> = top_n(groups, 3).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["b", "d", "a"]);
    }

    #[test]
    fn test_stats() {
        let input = vec![
            article("A", ArticleType::News, "s"),
            article("A", ArticleType::Blog, "s"),
            article("B", ArticleType::News, "s"),
        ];
        let stats = DashboardStats::from_articles(&input);
        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.unique_authors, 2);
        assert_eq!(stats.news_count, 2);
        assert_eq!(stats.blog_count, 1);
        assert_eq!(stats.news_percentage, 67);
        assert_eq!(stats.blog_percentage, 33);

        let empty = DashboardStats::from_articles(&[]);
        assert_eq!(empty.news_percentage, 0);
        assert_eq!(empty.blog_percentage, 0);
    }

    #[test]
    fn test_unique_authors_skips_unknown() {
        let input = vec![
            article("Zoe", ArticleType::News, "s"),
            article(UNKNOWN_AUTHOR, ArticleType::News, "s"),
            article("Al", ArticleType::News, "s"),
            article("Zoe", ArticleType::Blog, "s"),
        ];
        assert_eq!(unique_authors(&input), vec!["Zoe", "Al"]);
    }

    #[test]
    fn test_recent() {
        let input = vec![
            article("A", ArticleType::News, "s"),
            article("B", ArticleType::News, "s"),
        ];
        assert_eq!(recent(&input, 5).len(), 2);
        assert_eq!(recent(&input, 1)[0].author, "A");
    }

    #[test]
    fn test_relative_age() {
        let now = Utc.with_ymd_and_hms(2023, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(relative_age("2023-03-15T11:59:30Z", now), "just now");
        assert_eq!(relative_age("2023-03-15T11:59:00Z", now), "1 minute ago");
        assert_eq!(relative_age("2023-03-15T11:15:00Z", now), "45 minutes ago");
        assert_eq!(relative_age("2023-03-15T09:00:00Z", now), "3 hours ago");
        assert_eq!(relative_age("2023-03-12T12:00:00Z", now), "3 days ago");
        assert_eq!(relative_age("garbage", now), "recently");
    }
}
