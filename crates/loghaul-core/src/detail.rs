//! Detail rendering of a single record.
//!
//! Layout:
//!
//! ```text
//! level    : error
//!
//! timestamp: 2024-01-01 09:00:00
//!
//! message  : boom: detail
//!
//! ─────────────────────────────────────────────────
//!
//! code     : 500
//!
//! stack    :
//!   at a()
//!   at b()
//!
//! ```
//!
//! Core fields come first in fixed order, then every other field in
//! alphabetical order. Keys are padded to the longest key of the payload.

use serde_json::Value;

use crate::error::{LoghaulError, Result};
use crate::parser::CORE_FIELDS;
use crate::record::{LogRecord, Payload};
use crate::severity::Severity;

/// Extra width of the separator rule beyond the key column.
pub const RULE_EXTRA_WIDTH: usize = 40;

/// Character used for the separator rule.
pub const RULE_CHAR: char = '─';

/// Indent applied to continuation lines of multi-line values.
pub const CONTINUATION_INDENT: &str = "  ";

/// One rendered line of a [`Detail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLine {
    /// `key: value` on one line. `severity` is set on the level field.
    Field {
        /// Field name, unpadded.
        key: String,
        /// Rendered value.
        value: String,
        /// Severity of the value when the field is `level`.
        severity: Option<Severity>,
    },
    /// `key:` introducing a multi-line value.
    FieldHeader {
        /// Field name, unpadded.
        key: String,
    },
    /// One line of a multi-line value, without indent.
    Continuation(String),
    /// Separator between core and remaining fields.
    Rule(usize),
    /// Empty line.
    Blank,
}

/// Rendered detail view of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    /// Lines in display order.
    pub lines: Vec<DetailLine>,
    /// Width keys are padded to.
    pub key_width: usize,
}

impl Detail {
    /// Pads `key` to the key column.
    #[must_use]
    pub fn pad_key(&self, key: &str) -> String {
        format!("{key:<width$}", width = self.key_width)
    }

    /// Renders one line as plain text.
    #[must_use]
    pub fn render_line(&self, line: &DetailLine) -> String {
        match line {
            DetailLine::Field { key, value, .. } => format!("{}: {value}", self.pad_key(key)),
            DetailLine::FieldHeader { key } => format!("{}:", self.pad_key(key)),
            DetailLine::Continuation(text) => format!("{CONTINUATION_INDENT}{text}"),
            DetailLine::Rule(width) => RULE_CHAR.to_string().repeat(*width),
            DetailLine::Blank => String::new(),
        }
    }

    /// Renders every line as plain text joined by newlines.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&self.render_line(line));
            out.push('\n');
        }
        out
    }
}

/// Renders the payload attached to `record`.
#[must_use]
pub fn format(record: &LogRecord) -> Detail {
    format_payload(record.payload())
}

/// Decodes `raw` and renders it.
///
/// # Errors
///
/// Returns [`LoghaulError::Format`] if `raw` is not a JSON object.
pub fn format_raw(raw: &str) -> Result<Detail> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(payload)) => Ok(format_payload(&payload)),
        Ok(_) => Err(LoghaulError::Format("payload is not a JSON object".to_string())),
        Err(e) => Err(LoghaulError::Format(e.to_string())),
    }
}

/// Renders a decoded payload.
#[must_use]
pub fn format_payload(payload: &Payload) -> Detail {
    let key_width = payload.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut lines = Vec::new();

    for key in CORE_FIELDS {
        if let Some(value) = payload.get(key) {
            let text = value_text(value);
            let severity = (key == "level").then(|| Severity::classify(&text));
            push_field(&mut lines, key, text, severity);
        }
    }

    lines.push(DetailLine::Rule(key_width + RULE_EXTRA_WIDTH));
    lines.push(DetailLine::Blank);

    // Payload maps iterate in key order.
    for (key, value) in payload {
        if CORE_FIELDS.contains(&key.as_str()) {
            continue;
        }
        push_field(&mut lines, key, value_text(value), None);
    }

    Detail { lines, key_width }
}

fn push_field(lines: &mut Vec<DetailLine>, key: &str, text: String, severity: Option<Severity>) {
    if text.contains('\n') {
        lines.push(DetailLine::FieldHeader {
            key: key.to_string(),
        });
        lines.extend(text.split('\n').map(|l| DetailLine::Continuation(l.to_string())));
    } else {
        lines.push(DetailLine::Field {
            key: key.to_string(),
            value: text,
            severity,
        });
    }
    lines.push(DetailLine::Blank);
}

/// Strings render verbatim, everything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
