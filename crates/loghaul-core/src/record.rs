//! The normalized log record.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Decoded field mapping of a raw log line.
pub type Payload = Map<String, Value>;

/// One normalized log line.
///
/// Records are immutable once built by the parser. The decoded payload stays
/// attached to the record so the detail view renders exactly what was parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: String,
    timestamp: String,
    message: String,
    raw: String,
    source: String,
    sort_time: Option<NaiveDateTime>,
    payload: Payload,
}

impl LogRecord {
    pub(crate) fn new(
        level: String,
        timestamp: String,
        message: String,
        raw: String,
        source: String,
        sort_time: Option<NaiveDateTime>,
        payload: Payload,
    ) -> Self {
        Self {
            level,
            timestamp,
            message,
            raw,
            source,
            sort_time,
            payload,
        }
    }

    /// Severity label exactly as received (empty when absent).
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Literal timestamp field as received.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Primary message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The untouched input line.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Origin tag assigned by the component that fetched the line.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed instant of [`Self::timestamp`].
    ///
    /// `None` is the zero instant: the timestamp did not match the expected
    /// format. It orders below every parsed instant.
    #[must_use]
    pub const fn sort_time(&self) -> Option<NaiveDateTime> {
        self.sort_time
    }

    /// Every decoded field of the raw line, core fields included.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Case-insensitive comparison of the level label against `level`.
    #[must_use]
    pub fn level_is(&self, level: &str) -> bool {
        self.level.to_lowercase() == level.to_lowercase()
    }

    /// Display-only message prefix: the text before the first `:`.
    ///
    /// Lossy by construction, never used for filtering or ordering.
    #[must_use]
    pub fn message_prefix(&self) -> &str {
        self.message
            .split_once(':')
            .map_or(self.message.as_str(), |(prefix, _)| prefix)
    }

    /// Orders records most recent first; unparsed timestamps compare last.
    #[must_use]
    pub fn cmp_recency(&self, other: &Self) -> Ordering {
        other.sort_time.cmp(&self.sort_time)
    }
}
