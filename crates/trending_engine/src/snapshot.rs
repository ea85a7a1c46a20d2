//! Raw payload and per-run summary files.
//!
//! Layout under the output root:
//! `{slug}/{yyyy}/{mm}/{dd}/{time}/{token}-{slug}-trending[-{category}].json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::value::RawValue;
use trending_core::{Category, Host, RunTimestamp};

use crate::persist::{NoClobberWriter, PersistError};

/// Day directory of a host, shared by all runs of that day.
pub fn day_dir(root: &Path, host: &Host, stamp: &RunTimestamp) -> PathBuf {
    let (yyyy, mm, dd) = stamp.date_dirs();
    root.join(host.slug()).join(yyyy).join(mm).join(dd)
}

/// Directory holding the JSON snapshots of a single run.
pub fn run_dir(root: &Path, host: &Host, stamp: &RunTimestamp) -> PathBuf {
    day_dir(root, host, stamp).join(stamp.time_dir())
}

pub fn payload_filename(host: &Host, stamp: &RunTimestamp, category: &Category) -> String {
    format!("{}-{}-trending-{category}.json", stamp.file_token(), host.slug())
}

pub fn summary_filename(host: &Host, stamp: &RunTimestamp) -> String {
    format!("{}-{}-trending.json", stamp.file_token(), host.slug())
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    timestamp: String,
    host: &'a str,
    types: BTreeMap<&'a str, Box<RawValue>>,
}

/// Outcome of a summary write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryWritten {
    pub path: PathBuf,
    /// Categories left out because their payload is not valid JSON.
    pub skipped: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    root: PathBuf,
}

impl SnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one payload byte-for-byte.
    pub fn write_payload(
        &self,
        host: &Host,
        stamp: &RunTimestamp,
        category: &Category,
        bytes: &[u8],
    ) -> Result<PathBuf, PersistError> {
        let writer = NoClobberWriter::new(run_dir(&self.root, host, stamp));
        writer.write(&payload_filename(host, stamp, category), bytes)
    }

    /// Persist `{timestamp, host, types}` with every valid payload embedded as-is.
    pub fn write_summary(
        &self,
        host: &Host,
        stamp: &RunTimestamp,
        payloads: &BTreeMap<Category, Vec<u8>>,
    ) -> Result<SummaryWritten, PersistError> {
        let mut types = BTreeMap::new();
        let mut skipped = Vec::new();
        for (category, bytes) in payloads {
            let raw = std::str::from_utf8(bytes)
                .ok()
                .and_then(|text| RawValue::from_string(text.trim().to_string()).ok());
            match raw {
                Some(raw) => {
                    types.insert(category.as_str(), raw);
                }
                None => skipped.push(category.clone()),
            }
        }

        let doc = SummaryDocument {
            timestamp: stamp.label(),
            host: host.as_str(),
            types,
        };
        let content = serde_json::to_vec_pretty(&doc)?;

        let writer = NoClobberWriter::new(run_dir(&self.root, host, stamp));
        let path = writer.write(&summary_filename(host, stamp), &content)?;
        Ok(SummaryWritten { path, skipped })
    }
}
