use std::fmt;

use engine_logging::{engine_error, engine_info, engine_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Warn,
    Err,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => write!(f, "OK"),
            Outcome::Warn => write!(f, "WARN"),
            Outcome::Err => write!(f, "ERR"),
        }
    }
}

/// One reported operation result with its (host, category) context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub outcome: Outcome,
    pub host: Option<String>,
    pub category: Option<String>,
    pub message: String,
}

impl OutcomeRecord {
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            host: None,
            category: None,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Outcome::Ok, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Outcome::Warn, message)
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self::new(Outcome::Err, message)
    }

    pub fn host(mut self, host: impl fmt::Display) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn category(mut self, category: impl fmt::Display) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

impl fmt::Display for OutcomeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<4}", self.outcome.to_string())?;
        if let Some(host) = &self.host {
            write!(f, " {host}")?;
        }
        if let Some(category) = &self.category {
            write!(f, " {category}")?;
        }
        write!(f, ": {}", self.message)
    }
}

pub trait LogSink: Send + Sync {
    fn record(&self, record: OutcomeRecord);
}

/// Forwards records to the `log` facade, mapping outcomes onto levels.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeLogSink;

impl LogSink for FacadeLogSink {
    fn record(&self, record: OutcomeRecord) {
        match record.outcome {
            Outcome::Ok => engine_info!("{record}"),
            Outcome::Warn => engine_warn!("{record}"),
            Outcome::Err => engine_error!("{record}"),
        }
    }
}
