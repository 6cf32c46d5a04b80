//! # News Dashboard
//!
//! Fetches news and blog articles from a news provider, filters and pages
//! through them, and computes per-author payouts that can be exported as
//! CSV or JSON reports.
//!
//! ## Features
//!
//! - Headlines, per-category and free-text search fetches, with a built-in
//!   sample set whenever no API key is configured or the provider fails
//! - Filters by author, type, date range and text, given as flags or as a
//!   URL query string
//! - Per-author payouts at configurable news/blog rates, saved between runs
//! - Dated CSV and JSON payout reports
//!
//! ## Usage
//!
//! ```sh
//! news_dashboard payouts --type blog
//! news_dashboard export -o ./reports --format csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`sources::NewsSource`] queries the provider through a
//!    retrying HTTP transport and normalizes the response
//! 2. **Filtering**: [`filter::apply_filters`] narrows the article list
//! 3. **Aggregation**: [`payouts::compute_payouts`] prices each author's work
//! 4. **Output**: terminal tables or report files under [`outputs`]

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod filter;
mod models;
mod outputs;
mod payouts;
mod projection;
mod session;
mod sources;
mod store;
mod utils;

use api::{HttpFetcher, RetryFetch};
use cli::{Cli, Command, ExportFormat, FilterArgs, RatesAction, SortArg};
use config::NewsConfig;
use filter::apply_filters;
use models::{Article, PayoutRateConfig};
use outputs::json::PayoutReport;
use outputs::table;
use payouts::{PayoutSummary, sort_payouts};
use projection::{DashboardStats, Dimension, clamp_page, group_by, recent, top_n, unique_authors};
use session::Dashboard;
use sources::newsapi::Endpoint;
use sources::{ArticleBatch, BatchOrigin, FetchMode, NewsSource};
use store::FileStore;

type App = Dashboard<RetryFetch<HttpFetcher>, FileStore>;

const RECENT_ARTICLES: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(command = ?args.command, settings = %args.settings.display(), "Parsed CLI arguments");

    let config = NewsConfig::load(args.config.as_deref())?.with_api_key(args.api_key.clone());
    let endpoint = Endpoint::from_config(&config);
    info!(
        base_url = %config.base_url,
        country = %config.country,
        has_api_key = endpoint.has_credential(),
        "Loaded configuration"
    );

    let fetcher = RetryFetch::new(
        HttpFetcher::new(&config)?,
        config.max_retries,
        config.retry_base_delay(),
    );
    let source = NewsSource::new(fetcher, endpoint);
    let store = FileStore::new(&args.settings);
    debug!(path = %store.path().display(), "Using settings store");
    let mut dashboard = Dashboard::open(source, store);

    let outcome = match args.command {
        Command::News {
            filters,
            page,
            page_size,
        } => run_news(&mut dashboard, &filters, page, page_size.unwrap_or(config.page_size)).await,
        Command::Payouts { filters, sort } => run_payouts(&mut dashboard, &filters, sort).await,
        Command::Export {
            filters,
            output_dir,
            format,
        } => run_export(&mut dashboard, &filters, &output_dir, format).await,
        Command::Analytics {
            filters,
            top,
            categories,
        } => run_analytics(&mut dashboard, &filters, top, &categories).await,
        Command::Overview { filters } => run_overview(&mut dashboard, &filters).await,
        Command::Authors { filters } => run_authors(&mut dashboard, &filters).await,
        Command::Rates { action } => run_rates(&mut dashboard, action),
    };

    if let Err(e) = outcome {
        error!(error = %e, "Command failed");
        return Err(e.into());
    }

    info!(
        elapsed_ms = start_time.elapsed().as_millis(),
        "news_dashboard finished"
    );
    Ok(())
}

/// Apply the filter flags and fetch the matching article set.
async fn load_articles(dashboard: &mut App, filters: &FilterArgs) -> Vec<Article> {
    let state = dashboard.apply_criteria(filters.to_criteria());
    debug!(params = %state.criteria.to_query_string(), "Applied filters");
    match dashboard.load_current().await {
        Some(batch) => {
            note_origin(&batch);
            batch.articles
        }
        None => Vec::new(),
    }
}

fn note_origin(batch: &ArticleBatch) {
    if let BatchOrigin::Fallback { reason } = &batch.origin {
        eprintln!("Note: showing built-in sample data ({reason})");
    }
}

fn filtered(dashboard: &App, articles: &[Article]) -> Vec<Article> {
    apply_filters(articles, &dashboard.state().criteria)
}

async fn run_news(
    dashboard: &mut App,
    filters: &FilterArgs,
    page: usize,
    page_size: usize,
) -> error::Result<()> {
    let articles = load_articles(dashboard, filters).await;
    dashboard.go_to_page(page);
    let shown = dashboard.news_page(&articles, page_size);

    if shown.items.is_empty() {
        println!("No articles match the current filters.");
        return Ok(());
    }
    print!("{}", table::articles_table(&shown.items, Utc::now()));
    println!(
        "Page {} of {}",
        clamp_page(dashboard.state().page, shown.total_pages),
        shown.total_pages
    );
    Ok(())
}

async fn run_payouts(dashboard: &mut App, filters: &FilterArgs, sort: SortArg) -> error::Result<()> {
    let articles = load_articles(dashboard, filters).await;
    let rates = dashboard.state().rates;

    let mut rows = dashboard.payout_rows(&articles);
    sort_payouts(&mut rows, sort.into());
    if rows.is_empty() {
        println!("No articles match the current filters.");
    } else {
        print!("{}", table::payouts_table(&rows));
    }

    let summary = PayoutSummary::from_articles(&filtered(dashboard, &articles), &rates);
    println!();
    println!("{}", table::summary_block(&rates, &summary));
    Ok(())
}

async fn run_export(
    dashboard: &mut App,
    filters: &FilterArgs,
    output_dir: &Path,
    format: ExportFormat,
) -> error::Result<()> {
    let articles = load_articles(dashboard, filters).await;
    let rates = dashboard.state().rates;
    let rows = dashboard.payout_rows(&articles);
    let report = PayoutReport {
        generated_on: Utc::now().date_naive(),
        rates,
        payouts: &rows,
        summary: PayoutSummary::from_articles(&filtered(dashboard, &articles), &rates),
    };

    match outputs::export_report(output_dir, format, &report).await? {
        Some(path) => println!("Exported {} authors to {}", rows.len(), path.display()),
        None => println!("No data to export"),
    }
    Ok(())
}

async fn run_analytics(
    dashboard: &mut App,
    filters: &FilterArgs,
    top: usize,
    categories: &[String],
) -> error::Result<()> {
    let articles = if categories.is_empty() {
        let articles = load_articles(dashboard, filters).await;
        filtered(dashboard, &articles)
    } else {
        dashboard.apply_criteria(filters.to_criteria());
        let modes: Vec<FetchMode> = categories
            .iter()
            .map(|c| FetchMode::ByCategory(c.trim().to_string()))
            .collect();
        let batch = dashboard.source().fetch_many(&modes).await;
        note_origin(&batch);
        filtered(dashboard, &batch.articles)
    };

    if articles.is_empty() {
        println!("No articles match the current filters.");
        return Ok(());
    }

    let by_author = group_by(&articles, Dimension::Author);
    let ranked = by_author.len();
    println!("Articles by author");
    print!("{}", table::counts_table("Author", &top_n(by_author, ranked)));
    println!();
    println!("Articles by type");
    print!("{}", table::counts_table("Type", &group_by(&articles, Dimension::Type)));
    println!();
    println!("Top {top} sources");
    print!(
        "{}",
        table::counts_table("Source", &top_n(group_by(&articles, Dimension::Source), top))
    );
    Ok(())
}

async fn run_overview(dashboard: &mut App, filters: &FilterArgs) -> error::Result<()> {
    let articles = load_articles(dashboard, filters).await;
    let articles = filtered(dashboard, &articles);
    let rates = dashboard.state().rates;

    println!("{}", table::stats_block(&DashboardStats::from_articles(&articles)));
    println!();
    println!(
        "{}",
        table::summary_block(&rates, &PayoutSummary::from_articles(&articles, &rates))
    );
    println!();
    println!("Recent articles");
    print!(
        "{}",
        table::articles_table(recent(&articles, RECENT_ARTICLES), Utc::now())
    );
    Ok(())
}

async fn run_authors(dashboard: &mut App, filters: &FilterArgs) -> error::Result<()> {
    let state = dashboard.apply_criteria(filters.to_criteria());
    let mode = FetchMode::from_criteria(&state.criteria);
    let articles = dashboard.source().fetch_articles(&mode).await;
    let authors = unique_authors(&articles);
    if authors.is_empty() {
        println!("No named authors in the current articles.");
    }
    for author in authors {
        println!("{author}");
    }
    Ok(())
}

fn run_rates(dashboard: &mut App, action: RatesAction) -> error::Result<()> {
    match action {
        RatesAction::Show => {}
        RatesAction::Set {
            news_rate,
            blog_rate,
        } => {
            if news_rate.is_none() && blog_rate.is_none() {
                warn!("No rate given; nothing to change");
            } else {
                let current = dashboard.state().rates;
                let rates = PayoutRateConfig {
                    news_rate: news_rate.unwrap_or(current.news_rate),
                    blog_rate: blog_rate.unwrap_or(current.blog_rate),
                };
                dashboard.set_rates(rates)?;
            }
        }
    }
    let rates = dashboard.state().rates;
    println!("News rate: ${} per article", utils::format_money(rates.news_rate));
    println!("Blog rate: ${} per post", utils::format_money(rates.blog_rate));
    Ok(())
}
