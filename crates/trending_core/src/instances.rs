use std::collections::HashMap;

use crate::host::{Host, InvalidHost};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("instance list line {line}: {source}")]
pub struct InstanceListError {
    pub line: usize,
    #[source]
    pub source: InvalidHost,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hosts {first} and {second} share the output directory {slug:?}")]
pub struct SlugCollision {
    pub slug: String,
    pub first: Host,
    pub second: Host,
}

/// Parse a newline-delimited instance list. Blank lines and `#` comments are
/// skipped; the first line that fails validation aborts the whole list.
/// Repeated hosts keep their first position only.
pub fn parse_instance_list(text: &str) -> Result<Vec<Host>, InstanceListError> {
    let mut hosts: Vec<Host> = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let host = Host::parse(line).map_err(|source| InstanceListError {
            line: idx + 1,
            source,
        })?;
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    Ok(hosts)
}

/// Reject distinct hosts that would write into the same slug directory.
pub fn check_slug_collisions(hosts: &[Host]) -> Result<(), SlugCollision> {
    let mut seen: HashMap<String, &Host> = HashMap::with_capacity(hosts.len());
    for host in hosts {
        let slug = host.slug();
        match seen.get(&slug) {
            Some(first) if *first != host => {
                return Err(SlugCollision {
                    slug,
                    first: (*first).clone(),
                    second: host.clone(),
                });
            }
            Some(_) => {}
            None => {
                seen.insert(slug, host);
            }
        }
    }
    Ok(())
}
