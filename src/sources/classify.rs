//! Content-type classification for provider items without an explicit type.
//!
//! The provider only says *what* was published, never whether it is a news
//! report or a blog/opinion piece. The rules here are deterministic so the
//! same item always lands in the same payout bucket:
//!
//! | Fetch mode | Rule |
//! |------------|------|
//! | by category | `technology` and `science` are blog categories, the rest news |
//! | headlines, search | blog if the source, title or URL looks like a blog or opinion piece |
//!
//! An explicit `type` field on the raw item always wins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::FetchMode;
use crate::models::{ArticleType, RawArticle};

/// Provider categories whose items are paid at the blog rate.
pub const BLOG_CATEGORIES: [&str; 2] = ["technology", "science"];

static BLOG_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)blog|medium|substack|wordpress").expect("static regex"));

static OPINION_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(opinion|op-ed|editorial|commentary|column|perspective)\b")
        .expect("static regex")
});

static BLOG_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/(blog|blogs|opinion|opinions)(/|$)").expect("static regex"));

/// Decide the content type of a raw provider item fetched under `mode`.
pub fn classify(raw: &RawArticle, mode: &FetchMode) -> ArticleType {
    if let Some(explicit) = raw.kind.as_deref().and_then(|k| k.parse().ok()) {
        return explicit;
    }
    match mode {
        FetchMode::ByCategory(category) => classify_category(category),
        FetchMode::Headlines | FetchMode::Search(_) => {
            let source = raw.source.as_ref().and_then(|s| s.name.as_deref());
            if looks_like_blog(
                source.unwrap_or_default(),
                raw.title.as_deref().unwrap_or_default(),
                raw.url.as_deref().unwrap_or_default(),
            ) {
                ArticleType::Blog
            } else {
                ArticleType::News
            }
        }
    }
}

pub fn classify_category(category: &str) -> ArticleType {
    let category = category.trim();
    if BLOG_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
    {
        ArticleType::Blog
    } else {
        ArticleType::News
    }
}

/// Source-name, title-keyword and URL-path heuristic.
pub fn looks_like_blog(source: &str, title: &str, url: &str) -> bool {
    BLOG_SOURCE.is_match(source) || OPINION_TITLE.is_match(title) || blog_url(url)
}

fn blog_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            parsed
                .host_str()
                .is_some_and(|host| host.split('.').any(|label| label.eq_ignore_ascii_case("blog")))
                || BLOG_PATH.is_match(parsed.path())
        }
        Err(_) => false,
    }
}
