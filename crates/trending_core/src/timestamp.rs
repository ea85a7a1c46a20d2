use chrono::{DateTime, SecondsFormat, Utc};

/// The single UTC instant that names every artifact of one host pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTimestamp(DateTime<Utc>);

impl RunTimestamp {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// RFC 3339 with nanoseconds, e.g. `2025-01-02T03:04:05.000000000Z`.
    /// Fixed width, so labels sort lexically in time order.
    pub fn label(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    /// [`Self::label`] with `:` escaped for use in file names.
    pub fn file_token(&self) -> String {
        self.label().replace(':', "-")
    }

    /// `(yyyy, mm, dd)` directory components.
    pub fn date_dirs(&self) -> (String, String, String) {
        (
            self.0.format("%Y").to_string(),
            self.0.format("%m").to_string(),
            self.0.format("%d").to_string(),
        )
    }

    /// Time-of-day directory, `HH-MM-SS`.
    pub fn time_dir(&self) -> String {
        self.0.format("%H-%M-%S").to_string()
    }
}
