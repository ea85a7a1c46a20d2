use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use trending_core::{Category, CategoryTable};

use crate::fetch::{FetchSettings, DEFAULT_MAX_BYTES};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything one invocation needs. All fields have defaults.
#[derive(Debug, Clone)]
pub struct TrendingConfig {
    pub instances_file: PathBuf,
    pub output_root: PathBuf,
    pub categories: Vec<Category>,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub scheme: String,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            instances_file: PathBuf::from("_config").join("instance.txt"),
            output_root: PathBuf::from("."),
            categories: Category::standard(),
            http_timeout: fetch.request_timeout,
            user_agent: fetch.user_agent,
            scheme: fetch.scheme,
        }
    }
}

impl TrendingConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            scheme: self.scheme.clone(),
            request_timeout: self.http_timeout,
            max_bytes: DEFAULT_MAX_BYTES,
            user_agent: self.user_agent.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(self.output_root.clone(), self.categories.clone())
    }
}

/// Inputs of the orchestration loop once hosts are known.
#[derive(Clone)]
pub struct RunConfig {
    pub output_root: PathBuf,
    pub categories: Vec<Category>,
    pub table: CategoryTable,
    pub clock: Clock,
}

impl RunConfig {
    pub fn new(output_root: PathBuf, categories: Vec<Category>) -> Self {
        let table = CategoryTable::for_categories(&categories);
        Self {
            output_root,
            categories,
            table,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("output_root", &self.output_root)
            .field("categories", &self.categories)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
