use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use trending_core::{readme_title, render_section, Category, CategoryTable, Entry, Host, RunTimestamp};

use crate::persist::{append_once, PersistError};
use crate::snapshot::day_dir;

pub const README_FILENAME: &str = "README.md";

pub fn readme_path(root: &Path, host: &Host, stamp: &RunTimestamp) -> PathBuf {
    day_dir(root, host, stamp).join(README_FILENAME)
}

/// Append this run's table to the host's README for the day, writing the
/// title first when the file is new. Existing content is never read.
pub fn append_readme(
    root: &Path,
    host: &Host,
    stamp: &RunTimestamp,
    table: &CategoryTable,
    entries: &BTreeMap<Category, Vec<Entry>>,
) -> Result<PathBuf, PersistError> {
    let path = readme_path(root, host, stamp);

    let mut content = String::new();
    if !path.exists() {
        content.push_str(&readme_title(host));
    }
    content.push_str(&render_section(host, &stamp.label(), table, entries));

    append_once(&path, &content)?;
    Ok(path)
}
