use std::fmt;

/// A validated instance host: lowercase domain with an optional `:port`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Host(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidHostReason {
    Empty,
    SchemeOrPath,
    Charset,
}

impl fmt::Display for InvalidHostReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidHostReason::Empty => write!(f, "empty host"),
            InvalidHostReason::SchemeOrPath => write!(f, "use domain only"),
            InvalidHostReason::Charset => write!(f, "invalid characters"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid host {input:?}: {reason}")]
pub struct InvalidHost {
    pub input: String,
    pub reason: InvalidHostReason,
}

impl Host {
    /// Trim, lowercase and validate one raw instance line.
    pub fn parse(input: &str) -> Result<Self, InvalidHost> {
        let fail = |reason| InvalidHost {
            input: input.to_string(),
            reason,
        };

        let host = input.trim().to_lowercase();
        if host.is_empty() {
            return Err(fail(InvalidHostReason::Empty));
        }
        if host.contains('/') || host.contains(' ') || host.contains("http") {
            return Err(fail(InvalidHostReason::SchemeOrPath));
        }
        if !has_allowed_charset(&host) {
            return Err(fail(InvalidHostReason::Charset));
        }
        Ok(Self(host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem token for this host, see [`dashify`].
    pub fn slug(&self) -> String {
        dashify(&self.0)
    }

    /// `https://{host}` without a trailing slash.
    pub fn origin(&self) -> String {
        format!("https://{}", self.0)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `[a-z0-9.-]+` optionally followed by `:[0-9]+`, over the whole string.
/// The name needs at least one letter or digit so its slug is never empty.
fn has_allowed_charset(host: &str) -> bool {
    let (name, port) = match host.split_once(':') {
        Some((name, port)) => (name, Some(port)),
        None => (host, None),
    };
    let name_ok = name.chars().any(|c| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let port_ok = port.map_or(true, |p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    name_ok && port_ok
}

/// Convert a host into a slug made of `[a-z0-9-]` with single dashes and no
/// leading or trailing dash.
pub fn dashify(host: &str) -> String {
    let mut slug = String::with_capacity(host.len());
    let mut prev_dash = false;
    for c in host.chars() {
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if mapped == '-' {
            if !prev_dash {
                slug.push('-');
            }
            prev_dash = true;
        } else {
            slug.push(mapped);
            prev_dash = false;
        }
    }
    slug.trim_matches('-').to_string()
}
