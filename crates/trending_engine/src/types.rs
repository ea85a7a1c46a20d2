use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub url: String,
    pub bytes: Vec<u8>,
    /// The body hit the size ceiling and was cut short.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    RequestBuild,
    Transport,
    Timeout,
    HttpStatus(u16),
    BodyRead,
}

impl FailureKind {
    /// Non-success statuses are expected from some instances and only warrant a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, FailureKind::HttpStatus(_))
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::RequestBuild => write!(f, "build request"),
            FailureKind::Transport => write!(f, "fetch"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "non-success status {code}"),
            FailureKind::BodyRead => write!(f, "read body"),
        }
    }
}
