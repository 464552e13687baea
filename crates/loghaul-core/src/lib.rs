//! # loghaul-core
//!
//! Remote structured log acquisition and view filtering for loghaul.
//!
//! This crate provides:
//!
//! - [`RemoteChannel`] / [`SshChannel`] — One-shot remote command execution
//! - [`RemoteLister`] — Glob-based remote file discovery
//! - [`LogFetcher`] — File retrieval with transparent decompression
//! - [`parse_line`] — JSON line parsing into [`LogRecord`]s
//! - [`Aggregator`] — Per-origin acquisition with merge ordering
//! - [`FilterState`] / [`RecordSet`] — Origin × level filtering
//! - [`detail::format`] — Detail rendering of a single record
//!
//! ## Example
//!
//! ```rust
//! use loghaul_core::{parse_line, sort_by_recency, FilterState, RecordSet};
//!
//! let lines = [
//!     r#"{"level":"error","timestamp":"2024-01-01 09:00:00","message":"boom: detail"}"#,
//!     r#"{"level":"info","timestamp":"2024-01-01 10:00:00","message":"start"}"#,
//! ];
//! let mut records: Vec<_> = lines
//!     .iter()
//!     .filter_map(|line| parse_line(line, "email").ok())
//!     .collect();
//! sort_by_recency(&mut records);
//!
//! let mut set = RecordSet::new(records);
//! let mut filter = FilterState::new();
//! filter.select_level("ERROR");
//! set.apply(&filter);
//! assert_eq!(set.visible_len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregator;
pub mod detail;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod lister;
pub mod parser;
pub mod record;
pub mod remote;
pub mod severity;
pub mod shell;

// Re-export main types
pub use aggregator::{
    AggregateReport, Aggregation, Aggregator, AggregatorOptions, Origin, OriginReport,
    OriginSpec, sort_by_recency,
};
pub use detail::{Detail, DetailLine};
pub use display::ListItemView;
pub use error::{LoghaulError, Result};
pub use fetcher::{Compression, LogFetcher};
pub use filter::{FilterState, RecordSet};
pub use lister::RemoteLister;
pub use parser::{ParsedBatch, parse_line, parse_lines};
pub use record::{LogRecord, Payload};
pub use remote::{RemoteChannel, SshChannel, SshTarget};
pub use severity::Severity;
