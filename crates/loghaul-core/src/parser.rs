//! Line parsing into [`LogRecord`]s.
//!
//! Every fetched line is expected to be one JSON object. Decoding failures are
//! scoped to the line: callers drop the line and keep going.

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::debug;

use crate::error::{LoghaulError, Result};
use crate::record::{LogRecord, Payload};

/// Wire format of the `timestamp` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keys read into the normalized record.
pub const CORE_FIELDS: [&str; 3] = ["level", "timestamp", "message"];

/// Parses a timestamp in [`TIMESTAMP_FORMAT`], `None` on mismatch.
#[must_use]
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()
}

/// Parses one raw line fetched from `source`.
///
/// Missing or `null` core fields become empty strings. A core field holding a
/// non-string value rejects the line. A timestamp that does not match
/// [`TIMESTAMP_FORMAT`] keeps the record with the zero sort instant.
///
/// # Errors
///
/// Returns [`LoghaulError::Parse`] if the line is blank, is not valid JSON, is
/// not a JSON object, or carries a mistyped core field.
pub fn parse_line(line: &str, source: &str) -> Result<LogRecord> {
    if line.trim().is_empty() {
        return Err(LoghaulError::Parse("blank line".to_string()));
    }

    let value: Value =
        serde_json::from_str(line).map_err(|e| LoghaulError::Parse(e.to_string()))?;
    let Value::Object(payload) = value else {
        return Err(LoghaulError::Parse(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    };

    let level = string_field(&payload, "level")?;
    let timestamp = string_field(&payload, "timestamp")?;
    let message = string_field(&payload, "message")?;
    let sort_time = parse_timestamp(&timestamp);

    Ok(LogRecord::new(
        level,
        timestamp,
        message,
        line.to_string(),
        source.to_string(),
        sort_time,
        payload,
    ))
}

/// Records parsed from one batch of lines.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Successfully parsed records, in input order.
    pub records: Vec<LogRecord>,
    /// Number of lines that failed to parse.
    pub discarded: usize,
}

/// Parses every line of a batch, dropping lines that fail.
pub fn parse_lines<I, S>(lines: I, source: &str) -> ParsedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = ParsedBatch::default();
    for line in lines {
        match parse_line(line.as_ref(), source) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                debug!(source = %source, error = %e, "discarding unparsable line");
                batch.discarded += 1;
            }
        }
    }
    batch
}

fn string_field(payload: &Payload, key: &'static str) -> Result<String> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(LoghaulError::Parse(format!(
            "field `{key}` must be a string, found {}",
            json_kind(other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    #[test]
    fn parses_core_fields() {
        let line = r#"{"level":"info","timestamp":"2024-01-01 10:00:00","message":"start"}"#;
        let record = parse_line(line, "email").expect("valid line");

        assert_eq!(record.level(), "info");
        assert_eq!(record.timestamp(), "2024-01-01 10:00:00");
        assert_eq!(record.message(), "start");
        assert_eq!(record.raw(), line);
        assert_eq!(record.source(), "email");

        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(10, 0, 0));
        assert_eq!(record.sort_time(), expected);
    }

    #[test]
    fn source_comes_from_caller_not_payload() {
        let line = r#"{"level":"info","timestamp":"","message":"m","source":"spoofed"}"#;
        let record = parse_line(line, "nextjs").expect("valid line");
        assert_eq!(record.source(), "nextjs");
        assert_eq!(
            record.payload().get("source").and_then(Value::as_str),
            Some("spoofed")
        );
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let record = parse_line(r#"{"message":"only","level":null}"#, "email").expect("valid");
        assert_eq!(record.level(), "");
        assert_eq!(record.timestamp(), "");
        assert_eq!(record.message(), "only");
        assert_eq!(record.sort_time(), None);
    }

    #[test]
    fn mismatched_timestamp_keeps_record_with_zero_instant() {
        let line = r#"{"level":"info","timestamp":"2024-01-01T10:00:00Z","message":"iso"}"#;
        let record = parse_line(line, "email").expect("record retained");
        assert_eq!(record.sort_time(), None);
        assert_eq!(record.timestamp(), "2024-01-01T10:00:00Z");
    }

    #[test]
    fn extra_fields_are_kept_in_payload() {
        let line = r#"{"level":"error","timestamp":"","message":"m","stack":"a\nb","code":500}"#;
        let record = parse_line(line, "nextjs").expect("valid");
        assert_eq!(record.payload().len(), 5);
        assert_eq!(record.payload().get("code"), Some(&Value::from(500)));
    }

    #[test_case("not json" ; "plain text")]
    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace")]
    #[test_case("[1,2,3]" ; "array")]
    #[test_case("null" ; "null literal")]
    #[test_case(r#"{"level":"info""# ; "truncated object")]
    #[test_case(r#"{"level":3,"message":"m"}"# ; "numeric level")]
    #[test_case(r#"{"message":{"nested":true}}"# ; "object message")]
    fn rejects_malformed_lines(line: &str) {
        let result = parse_line(line, "email");
        assert!(matches!(result, Err(LoghaulError::Parse(_))));
    }

    #[test]
    fn batch_skips_bad_lines_without_aborting() {
        let lines = [
            r#"{"level":"info","timestamp":"2024-01-01 10:00:00","message":"a"}"#,
            "not json",
            r#"{"level":"error","timestamp":"2024-01-01 09:00:00","message":"b"}"#,
            "",
        ];
        let batch = parse_lines(lines, "email");
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.discarded, 2);
        assert_eq!(batch.records[0].message(), "a");
        assert_eq!(batch.records[1].message(), "b");
    }

    #[test_case("2024-02-29 23:59:59", true ; "leap day")]
    #[test_case("2024-13-01 00:00:00", false ; "bad month")]
    #[test_case("2024-01-01", false ; "date only")]
    #[test_case("2024-01-01 10:00:00 UTC", false ; "trailing zone")]
    fn timestamp_format(input: &str, parses: bool) {
        assert_eq!(parse_timestamp(input).is_some(), parses);
    }
}
