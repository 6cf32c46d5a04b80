//! Article filtering and filter-state parsing.
//!
//! [`apply_filters`] is a pure, stable filter: the output is the subsequence
//! of the input whose articles satisfy every active constraint.
//!
//! Filter state travels as query parameters (`author`, `type`, `category`,
//! `fromDate`, `toDate`, `q`). [`FilterCriteria::from_query_string`] turns
//! them back into [`FilterCriteria`].

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{Article, ArticleType, DateBound, FilterCriteria};

/// Keep the articles matching every constraint in `criteria`, in input order.
pub fn apply_filters(articles: &[Article], criteria: &FilterCriteria) -> Vec<Article> {
    if criteria.is_empty() {
        return articles.to_vec();
    }
    let needle = criteria
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let filtered: Vec<Article> = articles
        .iter()
        .filter(|a| matches_with(a, criteria, needle.as_deref()))
        .cloned()
        .collect();
    debug!(
        input = articles.len(),
        output = filtered.len(),
        "Applied filters"
    );
    filtered
}

fn matches_with(article: &Article, criteria: &FilterCriteria, needle: Option<&str>) -> bool {
    if let Some(author) = &criteria.author {
        if article.author != *author {
            return false;
        }
    }
    if let Some(kind) = criteria.kind {
        if article.kind != kind {
            return false;
        }
    }
    if let Some(bound) = &criteria.from_date {
        if !within(article, bound, |published, from| published >= from) {
            return false;
        }
    }
    if let Some(bound) = &criteria.to_date {
        if !within(article, bound, |published, to| published <= to) {
            return false;
        }
    }
    if let Some(needle) = needle {
        let hit = article.title.to_lowercase().contains(needle)
            || article.description.to_lowercase().contains(needle)
            || article.author.to_lowercase().contains(needle);
        if !hit {
            return false;
        }
    }
    true
}

/// A malformed bound, or an article date that does not parse, never matches.
fn within(article: &Article, bound: &DateBound, cmp: impl Fn(NaiveDate, NaiveDate) -> bool) -> bool {
    match (article.published_date(), bound.date()) {
        (Some(published), Some(limit)) => cmp(published, limit),
        _ => false,
    }
}

impl FilterCriteria {
    /// Build criteria from `key=value` pairs. Empty values count as absent;
    /// unknown keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = FilterCriteria::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "author" => criteria.author = Some(value.to_string()),
                "type" => match value.parse::<ArticleType>() {
                    Ok(kind) => criteria.kind = Some(kind),
                    Err(e) => warn!(error = %e, "Ignoring type filter"),
                },
                "category" => criteria.category = Some(value.to_string()),
                "fromDate" => criteria.from_date = Some(parse_bound("fromDate", value)),
                "toDate" => criteria.to_date = Some(parse_bound("toDate", value)),
                "q" => criteria.query = Some(value.to_string()),
                other => debug!(key = other, "Ignoring unknown filter parameter"),
            }
        }
        criteria
    }

    /// Parse a URL query string such as `author=Jane%20Smith&type=news`.
    /// A leading `?` is accepted.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Self::from_query_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Serialize back to query parameters, in the order the dashboard writes them.
    pub fn to_query_string(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if let Some(author) = &self.author {
            out.append_pair("author", author);
        }
        if let Some(kind) = self.kind {
            out.append_pair("type", kind.as_str());
        }
        if let Some(category) = &self.category {
            out.append_pair("category", category);
        }
        for (key, bound) in [("fromDate", &self.from_date), ("toDate", &self.to_date)] {
            match bound {
                Some(DateBound::On(date)) => {
                    out.append_pair(key, &date.format("%Y-%m-%d").to_string());
                }
                Some(DateBound::Malformed(raw)) => {
                    out.append_pair(key, raw);
                }
                None => {}
            }
        }
        if let Some(query) = &self.query {
            out.append_pair("q", query);
        }
        out.finish()
    }
}

fn parse_bound(key: &str, value: &str) -> DateBound {
    let bound = DateBound::parse(value);
    if let DateBound::Malformed(raw) = &bound {
        warn!(key, value = %raw, "Malformed date filter; it will match nothing");
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_AUTHOR;

    fn article(id: &str, author: &str, kind: ArticleType, published_at: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: format!("Description {id}"),
            author: author.to_string(),
            published_at: published_at.to_string(),
            source: "Wire".to_string(),
            kind,
            url: format!("https://example.com/{id}"),
        }
    }

    fn three() -> Vec<Article> {
        vec![
            article("1", "A", ArticleType::News, "2023-03-10T10:00:00Z"),
            article("2", "A", ArticleType::Blog, "2023-03-12T23:59:00Z"),
            article("3", "B", ArticleType::News, "2023-03-14T00:00:00Z"),
        ]
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> DateBound {
        DateBound::On(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_empty_criteria_returns_input() {
        let input = three();
        assert_eq!(apply_filters(&input, &FilterCriteria::default()), input);
    }

    #[test]
    fn test_type_filter_keeps_order() {
        let criteria = FilterCriteria {
            kind: Some(ArticleType::News),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&three(), &criteria)), vec!["1", "3"]);
    }

    #[test]
    fn test_author_is_exact_match() {
        let criteria = FilterCriteria {
            author: Some("a".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&three(), &criteria).is_empty());

        let criteria = FilterCriteria {
            author: Some("A".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&three(), &criteria)), vec!["1", "2"]);
    }

    #[test]
    fn test_date_range_is_inclusive_by_calendar_day() {
        let criteria = FilterCriteria {
            from_date: Some(date(2023, 3, 12)),
            to_date: Some(date(2023, 3, 14)),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&three(), &criteria)), vec!["2", "3"]);

        let criteria = FilterCriteria {
            to_date: Some(date(2023, 3, 12)),
            ..Default::default()
        };
        // 23:59 on the 12th still counts as the 12th
        assert_eq!(ids(&apply_filters(&three(), &criteria)), vec!["1", "2"]);
    }

    #[test]
    fn test_malformed_bound_matches_nothing() {
        let criteria = FilterCriteria {
            from_date: Some(DateBound::Malformed("soon".to_string())),
            ..Default::default()
        };
        assert!(apply_filters(&three(), &criteria).is_empty());
    }

    #[test]
    fn test_unparseable_article_date_fails_date_predicates_only() {
        let input = vec![article("1", "A", ArticleType::News, "not a date")];

        let criteria = FilterCriteria {
            from_date: Some(date(2000, 1, 1)),
            ..Default::default()
        };
        assert!(apply_filters(&input, &criteria).is_empty());

        let criteria = FilterCriteria {
            author: Some("A".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&input, &criteria).len(), 1);
    }

    #[test]
    fn test_query_matches_title_description_or_author() {
        let mut input = three();
        input[0].title = "Solar Power Surge".to_string();
        input[1].description = "A look at SOLAR farms".to_string();
        input[2].author = "Sol Smith".to_string();

        let criteria = FilterCriteria {
            query: Some("solar".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&input, &criteria)), vec!["1", "2"]);

        let criteria = FilterCriteria {
            query: Some("SOL".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&input, &criteria)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let criteria = FilterCriteria {
            author: Some("A".to_string()),
            kind: Some(ArticleType::Blog),
            from_date: Some(date(2023, 3, 1)),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&three(), &criteria)), vec!["2"]);
    }

    #[test]
    fn test_category_is_not_an_article_predicate() {
        let criteria = FilterCriteria {
            category: Some("science".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&three(), &criteria).len(), 3);
    }

    #[test]
    fn test_output_is_subsequence_of_input() {
        let mut input = three();
        input.push(article("4", UNKNOWN_AUTHOR, ArticleType::Blog, "2023-03-20T00:00:00Z"));
        input.push(article("5", "B", ArticleType::Blog, "2023-03-01T00:00:00Z"));

        let criteria = FilterCriteria {
            kind: Some(ArticleType::Blog),
            ..Default::default()
        };
        let output = apply_filters(&input, &criteria);

        let mut remaining = input.iter();
        for item in &output {
            assert!(remaining.any(|a| a == item), "out of order: {}", item.id);
        }
        assert_eq!(ids(&output), vec!["2", "4", "5"]);
    }

    #[test]
    fn test_from_query_string() {
        let criteria = FilterCriteria::from_query_string(
            "?author=Jane%20Smith&type=blog&fromDate=2023-03-01&toDate=bad&q=ai&category=&page=2",
        );
        assert_eq!(criteria.author.as_deref(), Some("Jane Smith"));
        assert_eq!(criteria.kind, Some(ArticleType::Blog));
        assert_eq!(criteria.from_date, Some(date(2023, 3, 1)));
        assert_eq!(criteria.to_date, Some(DateBound::Malformed("bad".to_string())));
        assert_eq!(criteria.query.as_deref(), Some("ai"));
        assert_eq!(criteria.category, None);
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let criteria = FilterCriteria::from_query_string("type=podcast");
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_query_string_round_trip() {
        let criteria = FilterCriteria {
            author: Some("Jane Smith".to_string()),
            kind: Some(ArticleType::News),
            category: Some("science".to_string()),
            from_date: Some(date(2023, 3, 1)),
            to_date: Some(date(2023, 3, 31)),
            query: Some("solar & wind".to_string()),
        };
        let encoded = criteria.to_query_string();
        assert!(encoded.starts_with("author=Jane+Smith&type=news&category=science"));
        assert_eq!(FilterCriteria::from_query_string(&encoded), criteria);
    }
}
