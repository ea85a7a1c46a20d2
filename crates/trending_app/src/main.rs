mod cli;

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use engine_logging::engine_info;
use log::LevelFilter;
use trending_engine::{run_blocking, FacadeLogSink};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    engine_logging::initialize(cli.log.into(), LevelFilter::Info);

    let config = cli.into_config()?;
    let started = Instant::now();
    let summary = run_blocking(&config, &FacadeLogSink).context("fetch failed")?;

    engine_info!(
        "done in {:?}: {} hosts, {} fetched, {} failed, {} README sections",
        started.elapsed(),
        summary.hosts,
        summary.fetched,
        summary.failed,
        summary.readme_sections
    );
    Ok(())
}
