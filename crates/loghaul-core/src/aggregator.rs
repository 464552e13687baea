//! Acquisition across origins and merge ordering.
//!
//! Each origin is either a single fixed log file or a directory whose files
//! are discovered by glob. Failures are contained: a bad line drops the line,
//! a bad file drops the file, an unreachable origin drops the origin. Whatever
//! was obtained is merged and sorted most recent first.

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use tokio::time::{Instant, timeout_at};
use tracing::{info, warn};

use crate::fetcher::LogFetcher;
use crate::lister::RemoteLister;
use crate::parser::parse_lines;
use crate::record::LogRecord;
use crate::remote::RemoteChannel;

/// Default number of files fetched concurrently within one origin.
pub const DEFAULT_MAX_PARALLEL_FETCHES: usize = 4;

/// Where an origin's log lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginSpec {
    /// One known log file.
    Fixed {
        /// Origin tag stamped on every record.
        tag: String,
        /// Remote path of the log file.
        path: String,
    },
    /// Files discovered under a directory by glob.
    Discovered {
        /// Origin tag stamped on every record.
        tag: String,
        /// Remote directory searched recursively.
        dir: String,
        /// File name glob, e.g. `error*.log*`.
        pattern: String,
    },
}

impl OriginSpec {
    /// Single-stream origin reading `path`.
    pub fn fixed(tag: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Fixed {
            tag: tag.into(),
            path: path.into(),
        }
    }

    /// Multi-file origin reading every file under `dir` matching `pattern`.
    pub fn discovered(
        tag: impl Into<String>,
        dir: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self::Discovered {
            tag: tag.into(),
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// The origin tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Fixed { tag, .. } | Self::Discovered { tag, .. } => tag,
        }
    }
}

/// An origin paired with the channel that reaches it.
#[derive(Debug)]
pub struct Origin<C> {
    /// What to fetch.
    pub spec: OriginSpec,
    /// How to reach it.
    pub channel: C,
}

impl<C> Origin<C> {
    /// Pairs `spec` with `channel`.
    pub const fn new(spec: OriginSpec, channel: C) -> Self {
        Self { spec, channel }
    }
}

/// Tuning for an acquisition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Files fetched concurrently within one discovered origin (at least 1).
    pub max_parallel_fetches: usize,
    /// Global deadline; in-flight fetches are abandoned when it expires.
    pub deadline: Option<Duration>,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            max_parallel_fetches: DEFAULT_MAX_PARALLEL_FETCHES,
            deadline: None,
        }
    }
}

/// Outcome of acquiring one origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginReport {
    /// Origin tag.
    pub tag: String,
    /// Files the origin tried to fetch.
    pub files: usize,
    /// Files whose fetch failed.
    pub files_failed: usize,
    /// Files still in flight when the deadline expired.
    pub files_abandoned: usize,
    /// Records parsed.
    pub records: usize,
    /// Lines that failed to parse.
    pub lines_discarded: usize,
    /// Why the whole origin produced nothing, if it did.
    pub failure: Option<String>,
}

impl OriginReport {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// One-line human summary, e.g. `nextjs: 42 records (1 file failed)`.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(failure) = &self.failure {
            return format!("{}: unavailable ({failure})", self.tag);
        }
        let mut notes = Vec::new();
        if self.files_failed > 0 {
            notes.push(plural(self.files_failed, "file failed", "files failed"));
        }
        if self.files_abandoned > 0 {
            notes.push(plural(self.files_abandoned, "file timed out", "files timed out"));
        }
        let records = plural(self.records, "record", "records");
        if notes.is_empty() {
            format!("{}: {records}", self.tag)
        } else {
            format!("{}: {records} ({})", self.tag, notes.join(", "))
        }
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Outcome of a whole acquisition run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Per-origin outcomes in configuration order.
    pub origins: Vec<OriginReport>,
}

impl AggregateReport {
    /// Total records obtained.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.origins.iter().map(|o| o.records).sum()
    }

    /// Origins that produced nothing because of a failure.
    pub fn failed_origins(&self) -> impl Iterator<Item = &OriginReport> {
        self.origins.iter().filter(|o| o.failure.is_some())
    }

    /// Joined per-origin summaries.
    #[must_use]
    pub fn summary(&self) -> String {
        self.origins
            .iter()
            .map(OriginReport::summary)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Records and report produced by [`Aggregator::aggregate`].
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Every parsed record, most recent first.
    pub records: Vec<LogRecord>,
    /// What happened per origin.
    pub report: AggregateReport,
}

/// Sorts records most recent first.
///
/// The sort is stable: records with equal instants, including every record
/// whose timestamp did not parse, keep their arrival order.
pub fn sort_by_recency(records: &mut [LogRecord]) {
    records.sort_by(LogRecord::cmp_recency);
}

/// Runs acquisition across origins.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    options: AggregatorOptions,
}

impl Aggregator {
    /// Creates an aggregator with `options`.
    #[must_use]
    pub const fn new(options: AggregatorOptions) -> Self {
        Self { options }
    }

    /// Fetches and parses every origin, then merges and sorts the records.
    ///
    /// Never fails: origins, files and lines that cannot be obtained are left
    /// out and accounted for in the report. Arrival order, which decides ties,
    /// is origin order, then listing order, then line order.
    pub async fn aggregate<C: RemoteChannel>(&self, origins: &[Origin<C>]) -> Aggregation {
        let deadline = self.options.deadline.map(|d| Instant::now() + d);

        let results = join_all(
            origins
                .iter()
                .map(|origin| self.collect_origin(origin, deadline)),
        )
        .await;

        let mut records = Vec::new();
        let mut report = AggregateReport::default();
        for (mut origin_records, origin_report) in results {
            records.append(&mut origin_records);
            report.origins.push(origin_report);
        }
        sort_by_recency(&mut records);

        info!(
            origins = origins.len(),
            records = records.len(),
            failed_origins = report.failed_origins().count(),
            "acquisition complete"
        );
        Aggregation { records, report }
    }

    async fn collect_origin<C: RemoteChannel>(
        &self,
        origin: &Origin<C>,
        deadline: Option<Instant>,
    ) -> (Vec<LogRecord>, OriginReport) {
        let tag = origin.spec.tag();
        let mut report = OriginReport::new(tag);

        let records = match &origin.spec {
            OriginSpec::Fixed { path, .. } => {
                self.collect_fixed(&origin.channel, tag, path, deadline, &mut report)
                    .await
            }
            OriginSpec::Discovered { dir, pattern, .. } => {
                self.collect_discovered(&origin.channel, tag, dir, pattern, deadline, &mut report)
                    .await
            }
        };

        report.records = records.len();
        if let Some(failure) = &report.failure {
            warn!(origin = %tag, reason = %failure, "origin unavailable");
        } else {
            info!(
                origin = %tag,
                records = report.records,
                files = report.files,
                files_failed = report.files_failed,
                lines_discarded = report.lines_discarded,
                "origin collected"
            );
        }
        (records, report)
    }

    async fn collect_fixed<C: RemoteChannel>(
        &self,
        channel: &C,
        tag: &str,
        path: &str,
        deadline: Option<Instant>,
        report: &mut OriginReport,
    ) -> Vec<LogRecord> {
        report.files = 1;
        match within(deadline, LogFetcher::new(channel).fetch(path)).await {
            Some(Ok(lines)) => {
                let batch = parse_lines(lines, tag);
                report.lines_discarded = batch.discarded;
                batch.records
            }
            Some(Err(e)) => {
                report.files_failed = 1;
                report.failure = Some(e.to_string());
                Vec::new()
            }
            None => {
                report.files_abandoned = 1;
                report.failure = Some("deadline expired".to_string());
                Vec::new()
            }
        }
    }

    async fn collect_discovered<C: RemoteChannel>(
        &self,
        channel: &C,
        tag: &str,
        dir: &str,
        pattern: &str,
        deadline: Option<Instant>,
        report: &mut OriginReport,
    ) -> Vec<LogRecord> {
        let paths = match within(deadline, RemoteLister::new(channel).list(dir, pattern)).await {
            Some(Ok(paths)) => paths,
            Some(Err(e)) => {
                report.failure = Some(e.to_string());
                return Vec::new();
            }
            None => {
                report.failure = Some("deadline expired while listing".to_string());
                return Vec::new();
            }
        };
        report.files = paths.len();

        let fetcher = LogFetcher::new(channel);
        let fetcher = &fetcher;
        let mut pending = stream::iter(paths.iter().enumerate().map(|(index, path)| async move {
            (index, path, fetcher.fetch(path).await)
        }))
        .buffer_unordered(self.options.max_parallel_fetches.max(1));

        let mut finished = 0;
        let mut collected: Vec<(usize, Vec<LogRecord>)> = Vec::with_capacity(paths.len());
        loop {
            let Some(next) = within(deadline, pending.next()).await else {
                report.files_abandoned = paths.len() - finished;
                warn!(
                    origin = %tag,
                    abandoned = report.files_abandoned,
                    "deadline expired, abandoning in-flight fetches"
                );
                break;
            };
            let Some((index, path, result)) = next else {
                break;
            };
            finished += 1;
            match result {
                Ok(lines) => {
                    let batch = parse_lines(lines, tag);
                    report.lines_discarded += batch.discarded;
                    collected.push((index, batch.records));
                }
                Err(e) => {
                    report.files_failed += 1;
                    warn!(origin = %tag, path = %path, error = %e, "skipping unreadable file");
                }
            }
        }

        collected.sort_by_key(|(index, _)| *index);
        collected
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect()
    }
}

/// Awaits `fut`, giving up at `deadline` if one is set.
async fn within<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(at) => timeout_at(at, fut).await.ok(),
        None => Some(fut.await),
    }
}
