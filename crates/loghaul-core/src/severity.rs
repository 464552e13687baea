//! Severity classification of free-form level labels.
//!
//! Level labels on the wire are arbitrary strings. The pipeline never rewrites
//! them; [`Severity`] only classifies a label for emphasis and for the set of
//! levels the dashboard offers as filters.

/// Known severity classes, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Debugging information
    Debug,
    /// General information
    Info,
    /// Warning conditions
    Warn,
    /// Error conditions
    Error,
    /// Unrecoverable conditions
    Fatal,
    /// Absent or unrecognized label
    Other,
}

impl Severity {
    /// Levels offered as filter selections, in key-binding order.
    pub const FILTERABLE: [Self; 5] = [Self::Debug, Self::Info, Self::Warn, Self::Error, Self::Fatal];

    /// Classifies a level label, ignoring case.
    ///
    /// Only the five canonical labels are recognized; aliases such as
    /// `warning` or `critical` are [`Severity::Other`].
    #[must_use]
    pub fn classify(level: &str) -> Self {
        match level.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            _ => Self::Other,
        }
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
