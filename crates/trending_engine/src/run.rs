//! Drives the (host × category) matrix for one invocation.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use trending_core::{
    check_slug_collisions, extract_entries, parse_instance_list, Category, Entry, Host,
    InstanceListError, RunTimestamp, SlugCollision,
};

use crate::config::{RunConfig, TrendingConfig};
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::readme::append_readme;
use crate::sink::{LogSink, OutcomeRecord};
use crate::snapshot::SnapshotWriter;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read instances {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read instances {path:?}: {source}")]
    InvalidInstances {
        path: PathBuf,
        #[source]
        source: InstanceListError,
    },
    #[error(transparent)]
    SlugCollision(#[from] SlugCollision),
}

/// Failures that stop the run before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// Counters for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub hosts: usize,
    pub fetched: usize,
    pub failed: usize,
    pub payload_files: usize,
    pub summaries: usize,
    pub readme_sections: usize,
}

/// Read and validate the instance list. A missing file yields `Ok(None)`.
pub fn load_instances(path: &Path) -> Result<Option<Vec<Host>>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let hosts = parse_instance_list(&text).map_err(|source| ConfigError::InvalidInstances {
        path: path.to_path_buf(),
        source,
    })?;
    check_slug_collisions(&hosts)?;
    Ok(Some(hosts))
}

/// Per-host results collected while its categories resolve.
#[derive(Debug)]
struct HostAccumulator {
    payloads: BTreeMap<Category, Vec<u8>>,
    entries: BTreeMap<Category, Vec<Entry>>,
}

impl HostAccumulator {
    fn new() -> Self {
        Self {
            payloads: BTreeMap::new(),
            entries: BTreeMap::new(),
        }
    }

    fn record(&mut self, category: &Category, bytes: Vec<u8>, entries: Vec<Entry>) {
        if !entries.is_empty() {
            self.entries.insert(category.clone(), entries);
        }
        self.payloads.insert(category.clone(), bytes);
    }
}

pub struct Orchestrator<'a> {
    config: RunConfig,
    fetcher: &'a dyn Fetcher,
    sink: &'a dyn LogSink,
    snapshots: SnapshotWriter,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: RunConfig, fetcher: &'a dyn Fetcher, sink: &'a dyn LogSink) -> Self {
        let snapshots = SnapshotWriter::new(config.output_root.clone());
        Self {
            config,
            fetcher,
            sink,
            snapshots,
        }
    }

    /// Process every host in order. Failures are reported to the sink and
    /// never stop the remaining pairs.
    pub async fn run_hosts(&self, hosts: &[Host]) -> RunSummary {
        let mut summary = RunSummary::default();
        for host in hosts {
            self.run_host(host, &mut summary).await;
            summary.hosts += 1;
        }
        summary
    }

    async fn run_host(&self, host: &Host, summary: &mut RunSummary) {
        let stamp = RunTimestamp::new((self.config.clock)());
        let categories = &self.config.categories;

        let results = join_all(
            categories
                .iter()
                .map(|category| self.fetcher.fetch(host, category)),
        )
        .await;

        let mut acc = HostAccumulator::new();
        for (category, result) in categories.iter().zip(results) {
            let output = match result {
                Ok(output) => output,
                Err(err) => {
                    summary.failed += 1;
                    let record = if err.kind.is_warning() {
                        OutcomeRecord::warn(err.to_string())
                    } else {
                        OutcomeRecord::err(err.to_string())
                    };
                    self.sink.record(record.host(host).category(category));
                    continue;
                }
            };
            summary.fetched += 1;
            if output.truncated {
                self.sink.record(
                    OutcomeRecord::warn(format!(
                        "body truncated at {} bytes from {}",
                        output.bytes.len(),
                        output.url
                    ))
                    .host(host)
                    .category(category),
                );
            }

            match self
                .snapshots
                .write_payload(host, &stamp, category, &output.bytes)
            {
                Ok(path) => {
                    summary.payload_files += 1;
                    self.sink.record(
                        OutcomeRecord::ok(format!("saved {}", path.display()))
                            .host(host)
                            .category(category),
                    );
                }
                Err(err) => self.sink.record(
                    OutcomeRecord::err(format!("write payload: {err}"))
                        .host(host)
                        .category(category),
                ),
            }

            let entries = extract_entries(&output.bytes, host, category);
            acc.record(category, output.bytes, entries);
        }

        if !acc.payloads.is_empty() {
            self.write_summary(host, &stamp, &acc, summary);
        }
        if !acc.entries.is_empty() {
            self.write_readme(host, &stamp, &acc, summary);
        }
    }

    fn write_summary(
        &self,
        host: &Host,
        stamp: &RunTimestamp,
        acc: &HostAccumulator,
        summary: &mut RunSummary,
    ) {
        match self.snapshots.write_summary(host, stamp, &acc.payloads) {
            Ok(written) => {
                summary.summaries += 1;
                for category in &written.skipped {
                    self.sink.record(
                        OutcomeRecord::warn("payload is not valid JSON; left out of summary")
                            .host(host)
                            .category(category),
                    );
                }
                self.sink.record(
                    OutcomeRecord::ok(format!("saved summary {}", written.path.display()))
                        .host(host),
                );
            }
            Err(err) => self
                .sink
                .record(OutcomeRecord::err(format!("write summary: {err}")).host(host)),
        }
    }

    fn write_readme(
        &self,
        host: &Host,
        stamp: &RunTimestamp,
        acc: &HostAccumulator,
        summary: &mut RunSummary,
    ) {
        match append_readme(
            self.snapshots.root(),
            host,
            stamp,
            &self.config.table,
            &acc.entries,
        ) {
            Ok(path) => {
                summary.readme_sections += 1;
                self.sink.record(
                    OutcomeRecord::ok(format!("appended {}", path.display())).host(host),
                );
            }
            Err(err) => self
                .sink
                .record(OutcomeRecord::err(format!("write README: {err}")).host(host)),
        }
    }
}

/// Load the instance list and run every configured host.
///
/// Only configuration problems are returned as errors; a missing or empty
/// instance list is logged and treated as nothing to do.
pub async fn run(
    config: &TrendingConfig,
    fetcher: &dyn Fetcher,
    sink: &dyn LogSink,
) -> Result<RunSummary, RunError> {
    let hosts = match load_instances(&config.instances_file)? {
        Some(hosts) => hosts,
        None => {
            sink.record(OutcomeRecord::warn(format!(
                "instance list {} not found; nothing to do",
                config.instances_file.display()
            )));
            return Ok(RunSummary::default());
        }
    };
    if hosts.is_empty() {
        sink.record(OutcomeRecord::warn(format!(
            "no instances configured in {}",
            config.instances_file.display()
        )));
        return Ok(RunSummary::default());
    }

    let orchestrator = Orchestrator::new(config.run_config(), fetcher, sink);
    Ok(orchestrator.run_hosts(&hosts).await)
}

/// Run with the reqwest fetcher on a dedicated Tokio runtime.
pub fn run_blocking(config: &TrendingConfig, sink: &dyn LogSink) -> Result<RunSummary, RunError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(RunError::Runtime)?;
    let fetcher = ReqwestFetcher::new(config.fetch_settings());
    runtime.block_on(run(config, &fetcher, sink))
}
