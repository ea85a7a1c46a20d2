use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use engine_logging::LogDestination;
use trending_core::Category;
use trending_engine::TrendingConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scheme {
    Https,
    Http,
}

#[derive(Debug, Parser)]
#[command(
    name = "fetch_trending",
    version,
    about = "Snapshot trending listings of catalog instances into dated JSON and Markdown files"
)]
pub struct Cli {
    /// Path to the instance list (one host per line).
    #[arg(long, value_name = "FILE", default_value = "_config/instance.txt")]
    pub instances: PathBuf,

    /// Output root directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Comma-separated trending types.
    #[arg(long, value_name = "LIST", default_value = "book,movie,tv,music,game,podcast,collection")]
    pub types: String,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 20)]
    pub timeout: u64,

    /// HTTP User-Agent header; empty to omit.
    #[arg(long, default_value = "neodb-trending-history-bot")]
    pub ua: String,

    #[arg(long, value_enum, default_value_t = Scheme::Https)]
    pub scheme: Scheme,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<TrendingConfig> {
        let mut categories = Category::parse_list(&self.types).context("parse --types")?;
        if categories.is_empty() {
            categories = Category::standard();
        }
        let scheme = match self.scheme {
            Scheme::Https => "https",
            Scheme::Http => "http",
        };
        Ok(TrendingConfig {
            instances_file: self.instances,
            output_root: self.out,
            categories,
            http_timeout: Duration::from_secs(self.timeout),
            user_agent: self.ua,
            scheme: scheme.to_string(),
        })
    }
}
