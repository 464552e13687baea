//! List presentation of records.

use crate::record::LogRecord;

/// Column width of the bracketed origin label.
pub const ORIGIN_COLUMN: usize = 8;

/// Column width of the bracketed level label.
pub const LEVEL_COLUMN: usize = 10;

/// What a list row needs from an item.
pub trait ListItemView {
    /// Primary row text.
    fn title(&self) -> String;

    /// Secondary row text.
    fn description(&self) -> &str;

    /// Text a free-text list search would match against.
    fn filter_value(&self) -> &str;
}

/// `[origin]` label.
#[must_use]
pub fn origin_label(record: &LogRecord) -> String {
    format!("[{}]", record.source())
}

/// `[level]` label.
#[must_use]
pub fn level_label(record: &LogRecord) -> String {
    format!("[{}]", record.level())
}

impl ListItemView for LogRecord {
    /// `[origin] [level] prefix`, with the two labels padded into columns.
    fn title(&self) -> String {
        format!(
            "{:<origin$} {:<level$} {}",
            origin_label(self),
            level_label(self),
            self.message_prefix(),
            origin = ORIGIN_COLUMN,
            level = LEVEL_COLUMN,
        )
    }

    fn description(&self) -> &str {
        self.timestamp()
    }

    fn filter_value(&self) -> &str {
        self.message()
    }
}
