//! Trending engine: fetching, persistence and run orchestration.
mod config;
mod fetch;
mod persist;
mod readme;
mod run;
mod sink;
mod snapshot;
mod types;

pub use config::{Clock, RunConfig, TrendingConfig};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_MAX_BYTES};
pub use persist::{append_once, ensure_output_dir, NoClobberWriter, PersistError};
pub use readme::{append_readme, readme_path, README_FILENAME};
pub use run::{
    load_instances, run, run_blocking, ConfigError, Orchestrator, RunError, RunSummary,
};
pub use sink::{FacadeLogSink, LogSink, Outcome, OutcomeRecord};
pub use snapshot::{
    day_dir, payload_filename, run_dir, summary_filename, SnapshotWriter, SummaryWritten,
};
pub use types::{FailureKind, FetchError, FetchOutput};
