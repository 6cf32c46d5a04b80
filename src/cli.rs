//! Command-line interface definitions for the news dashboard.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Global options can also come from environment variables.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::{ArticleType, DateBound, FilterCriteria};
use crate::payouts::PayoutSort;

/// Command-line arguments for the news dashboard.
///
/// # Examples
///
/// ```sh
/// # Latest headlines, second page
/// news_dashboard news --page 2
///
/// # Blog payouts for one author since March
/// news_dashboard payouts --author "John Doe" --type blog --from-date 2023-03-01
///
/// # Export the payout table as CSV
/// news_dashboard export -o ./reports
///
/// # Filters copied from a dashboard URL
/// news_dashboard payouts --params 'author=Jane%20Smith&type=news'
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News provider API key; without one the built-in sample data is used
    #[arg(long, env = "NEWS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_DASHBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Where saved settings (payout rates) live
    #[arg(
        long,
        env = "NEWS_DASHBOARD_SETTINGS",
        global = true,
        default_value = ".news_dashboard/settings.json"
    )]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List filtered articles, one page at a time
    News {
        #[command(flatten)]
        filters: FilterArgs,
        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Articles per page; defaults to the config value
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Per-author payouts for the filtered articles
    Payouts {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = SortArg::FirstSeen)]
        sort: SortArg,
    },
    /// Write the payout table to a dated report file
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Article counts by author, type and source
    Analytics {
        #[command(flatten)]
        filters: FilterArgs,
        /// How many top sources to show
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Fetch several categories at once (comma-separated)
        #[arg(long = "categories", value_delimiter = ',')]
        categories: Vec<String>,
    },
    /// Headline numbers, payout totals and the most recent articles
    Overview {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Authors available for filtering
    Authors {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show or change the payout rates
    Rates {
        #[command(subcommand)]
        action: RatesAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RatesAction {
    Show,
    Set {
        /// Payout per news article
        #[arg(long)]
        news_rate: Option<f64>,
        /// Payout per blog post
        #[arg(long)]
        blog_rate: Option<f64>,
    },
}

/// Filter flags shared by every article view. Explicit flags override the
/// same key inside `--params`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub author: Option<String>,
    /// `news` or `blog`
    #[arg(long = "type")]
    pub kind: Option<ArticleType>,
    /// Provider category (also selects what is fetched)
    #[arg(long)]
    pub category: Option<String>,
    /// Inclusive lower bound, YYYY-MM-DD
    #[arg(long)]
    pub from_date: Option<String>,
    /// Inclusive upper bound, YYYY-MM-DD
    #[arg(long)]
    pub to_date: Option<String>,
    /// Free-text search
    #[arg(short, long)]
    pub query: Option<String>,
    /// URL query string with the same keys, e.g. `author=Jane&type=news`
    #[arg(long)]
    pub params: Option<String>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> FilterCriteria {
        let mut criteria = self
            .params
            .as_deref()
            .map(FilterCriteria::from_query_string)
            .unwrap_or_default();

        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(author) = non_empty(&self.author) {
            criteria.author = Some(author);
        }
        if let Some(kind) = self.kind {
            criteria.kind = Some(kind);
        }
        if let Some(category) = non_empty(&self.category) {
            criteria.category = Some(category);
        }
        if let Some(from) = non_empty(&self.from_date) {
            criteria.from_date = Some(DateBound::parse(&from));
        }
        if let Some(to) = non_empty(&self.to_date) {
            criteria.to_date = Some(DateBound::parse(&to));
        }
        if let Some(query) = non_empty(&self.query) {
            criteria.query = Some(query);
        }
        criteria
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    FirstSeen,
    Author,
    Total,
}

impl From<SortArg> for PayoutSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::FirstSeen => PayoutSort::FirstSeen,
            SortArg::Author => PayoutSort::Author,
            SortArg::Total => PayoutSort::TotalDesc,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}
