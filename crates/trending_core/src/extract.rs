use serde_json::{Map, Value};

use crate::category::Category;
use crate::host::Host;

/// Well-known keys that hold the listing array, checked in this order.
const ARRAY_KEYS: &[&str] = &["results", "items", "data", "objects", "list"];
const TITLE_KEYS: &[&str] = &["title", "name", "text", "caption"];
const SUBJECT_TITLE_KEYS: &[&str] = &["title", "name"];
const IMAGE_KEYS: &[&str] = &["cover_image_url", "cover", "image"];

/// Normalized view of one trending item. Empty strings mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub image: String,
    pub link: String,
}

impl Entry {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.image.is_empty() && self.link.is_empty()
    }
}

/// Best-effort extraction of entries from an arbitrary trending payload.
///
/// Anything that is not JSON, or JSON without a listing array, yields an
/// empty list.
pub fn extract_entries(payload: &[u8], host: &Host, category: &Category) -> Vec<Entry> {
    let Ok(doc) = serde_json::from_slice::<Value>(payload) else {
        return Vec::new();
    };
    let Some(items) = find_listing(&doc) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| Entry {
            title: pick_title(item),
            image: pick_image(item),
            link: pick_link(item, host, category),
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn find_listing(doc: &Value) -> Option<&Vec<Value>> {
    match doc {
        Value::Array(items) => Some(items),
        Value::Object(map) => {
            if let Some(items) = ARRAY_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
            {
                return Some(items);
            }
            // Map iteration order depends on serde_json features; sort explicitly.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            keys.into_iter()
                .find_map(|key| map.get(key.as_str()).and_then(Value::as_array))
        }
        _ => None,
    }
}

fn first_string<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

fn subject(item: &Map<String, Value>) -> Option<&Map<String, Value>> {
    item.get("subject").and_then(Value::as_object)
}

fn pick_title(item: &Map<String, Value>) -> String {
    first_string(item, TITLE_KEYS)
        .or_else(|| subject(item).and_then(|s| first_string(s, SUBJECT_TITLE_KEYS)))
        .unwrap_or_default()
        .to_string()
}

fn pick_image(item: &Map<String, Value>) -> String {
    first_string(item, IMAGE_KEYS)
        .or_else(|| subject(item).and_then(|s| first_string(s, IMAGE_KEYS)))
        .unwrap_or_default()
        .to_string()
}

fn pick_link(item: &Map<String, Value>, host: &Host, category: &Category) -> String {
    let sub = subject(item);
    let url = first_string(item, &["url"]).or_else(|| sub.and_then(|s| first_string(s, &["url"])));
    if let Some(url) = url {
        return resolve_url(url, host);
    }
    if let Some(id) = id_value(item).or_else(|| sub.and_then(id_value)) {
        return resolve_id(&id, host, category);
    }
    String::new()
}

/// Non-empty string ids, or integer ids rendered in decimal.
fn id_value(map: &Map<String, Value>) -> Option<String> {
    match map.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

fn is_absolute(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn resolve_url(url: &str, host: &Host) -> String {
    if is_absolute(url) {
        url.to_string()
    } else if url.starts_with('/') {
        format!("{}{url}", host.origin())
    } else {
        format!("{}/{url}", host.origin())
    }
}

fn resolve_id(id: &str, host: &Host, category: &Category) -> String {
    if is_absolute(id) {
        id.to_string()
    } else if id.starts_with('/') {
        format!("{}{id}", host.origin())
    } else {
        format!("{}/{category}/{id}", host.origin())
    }
}
