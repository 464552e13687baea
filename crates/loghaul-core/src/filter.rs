//! Two-axis record filtering.
//!
//! [`FilterState`] holds at most one active origin and at most one active
//! level. Selecting on an axis replaces that axis' previous selection; the two
//! axes are AND-ed. [`RecordSet`] recomputes its visible subset from the full
//! record list on every change, never from the previous subset.

use crate::record::LogRecord;

/// Active filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    origin: Option<String>,
    level: Option<String>,
}

impl FilterState {
    /// Creates a state with both axes unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows only records from origin `tag`.
    pub fn select_origin(&mut self, tag: impl Into<String>) {
        self.origin = Some(tag.into());
    }

    /// Shows records from every origin.
    pub fn clear_origin(&mut self) {
        self.origin = None;
    }

    /// Shows only records whose level equals `level`, ignoring case.
    pub fn select_level(&mut self, level: &str) {
        self.level = Some(level.to_lowercase());
    }

    /// Shows records of every level.
    pub fn clear_level(&mut self) {
        self.level = None;
    }

    /// The active origin, if any.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// The active level (lowercase), if any.
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    /// True when neither axis is set.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.origin.is_none() && self.level.is_none()
    }

    /// Whether `record` is visible under this state.
    #[must_use]
    pub fn matches(&self, record: &LogRecord) -> bool {
        let origin_ok = self
            .origin
            .as_deref()
            .is_none_or(|origin| record.source() == origin);
        let level_ok = self
            .level
            .as_deref()
            .is_none_or(|level| record.level().to_lowercase() == level);
        origin_ok && level_ok
    }

    /// Status text, e.g. `origin: email | level: all`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "origin: {} | level: {}",
            self.origin().unwrap_or("all"),
            self.level().unwrap_or("all")
        )
    }
}

/// Indices of the records visible under `filter`, in record order.
#[must_use]
pub fn visible_indices(records: &[LogRecord], filter: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .map(|(index, _)| index)
        .collect()
}

/// The full ordered record list and its currently visible subset.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<LogRecord>,
    visible: Vec<usize>,
}

impl RecordSet {
    /// Wraps an ordered record list with every record visible.
    #[must_use]
    pub fn new(records: Vec<LogRecord>) -> Self {
        let visible = (0..records.len()).collect();
        Self { records, visible }
    }

    /// Recomputes the visible subset for `filter` from the full list.
    pub fn apply(&mut self, filter: &FilterState) {
        self.visible = visible_indices(&self.records, filter);
    }

    /// Every record in order.
    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Indices of visible records into [`Self::records`].
    #[must_use]
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    /// Visible records in order.
    pub fn visible(&self) -> impl Iterator<Item = &LogRecord> {
        self.visible.iter().map(|&index| &self.records[index])
    }

    /// The `position`-th visible record.
    #[must_use]
    pub fn get_visible(&self, position: usize) -> Option<&LogRecord> {
        self.visible
            .get(position)
            .and_then(|&index| self.records.get(index))
    }

    /// Number of visible records.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Number of records in total.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct origin tags in first-seen order.
    #[must_use]
    pub fn origins(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for record in &self.records {
            if !tags.contains(&record.source()) {
                tags.push(record.source());
            }
        }
        tags
    }
}
