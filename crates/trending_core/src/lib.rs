//! Trending core: host validation, payload extraction and Markdown rendering.
mod category;
mod extract;
mod host;
mod instances;
mod markdown;
mod timestamp;

pub use category::{Category, CategoryTable, InvalidCategory};
pub use extract::{extract_entries, Entry};
pub use host::{dashify, Host, InvalidHost, InvalidHostReason};
pub use instances::{check_slug_collisions, parse_instance_list, InstanceListError, SlugCollision};
pub use markdown::{
    escape_pipes, fold_line_breaks, readme_title, render_cell, render_section, TABLE_ITEM_COLUMNS,
};
pub use timestamp::RunTimestamp;
