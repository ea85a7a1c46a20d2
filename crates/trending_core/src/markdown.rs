use std::collections::BTreeMap;
use std::fmt::Write;

use crate::category::{Category, CategoryTable};
use crate::extract::Entry;
use crate::host::Host;

/// Item slots per table row; the label column comes on top of these.
pub const TABLE_ITEM_COLUMNS: usize = 19;

/// Title line written once when a day's README is created.
pub fn readme_title(host: &Host) -> String {
    format!(
        "# NeoDB Trending History for [{host}]({origin}/)\n\n",
        origin = host.origin()
    )
}

/// Render one run's section: heading, blank header row, separator row and one
/// row per category of `table` that has at least one entry.
pub fn render_section(
    host: &Host,
    heading: &str,
    table: &CategoryTable,
    entries: &BTreeMap<Category, Vec<Entry>>,
) -> String {
    let total_columns = 1 + TABLE_ITEM_COLUMNS;
    let mut out = String::new();

    let _ = writeln!(out, "## {heading}");
    out.push('|');
    out.push_str(&"      |".repeat(total_columns));
    out.push_str("\n|");
    out.push_str(&" ---- |".repeat(total_columns));
    out.push('\n');

    for (category, label) in table.rows() {
        let Some(items) = entries.get(category).filter(|items| !items.is_empty()) else {
            continue;
        };
        let _ = write!(out, "| {} |", escape_pipes(label));
        for slot in 0..TABLE_ITEM_COLUMNS {
            let cell = items
                .get(slot)
                .map(|entry| render_cell(entry, host))
                .unwrap_or_default();
            let _ = write!(out, " {cell} |");
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Render one table cell, combining image, title and link.
pub fn render_cell(entry: &Entry, host: &Host) -> String {
    let title = escape_pipes(&fold_line_breaks(entry.title.trim()));
    let image = if entry.image.starts_with('/') {
        format!("{}{}", host.origin(), entry.image)
    } else {
        entry.image.clone()
    };
    let link = entry.link.as_str();

    match (link.is_empty(), image.is_empty()) {
        (false, false) => format!("[![]({image})<br/>{title}]({link})"),
        (false, true) => format!("[{title}]({link})"),
        (true, false) => format!("![]({image})<br/>{title}"),
        (true, true) => title,
    }
}

/// Replace each run of `\r`/`\n` with one space so a title stays on its row.
pub fn fold_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

/// Escape `|` so cell text cannot split a table column.
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}
