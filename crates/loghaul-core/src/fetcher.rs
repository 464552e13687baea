//! Remote log file retrieval with transparent decompression.

use tracing::debug;

use crate::error::Result;
use crate::remote::RemoteChannel;
use crate::shell::quote_path;

/// Compression format inferred from a file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Uncompressed text
    None,
    /// gzip (`.gz`)
    Gzip,
    /// bzip2 (`.bz2`)
    Bzip2,
    /// xz (`.xz`)
    Xz,
    /// Zstandard (`.zst`)
    Zstd,
}

impl Compression {
    /// Detects the compression of `path` from its suffix.
    #[must_use]
    pub fn detect(path: &str) -> Self {
        if path.ends_with(".gz") {
            Self::Gzip
        } else if path.ends_with(".bz2") {
            Self::Bzip2
        } else if path.ends_with(".xz") {
            Self::Xz
        } else if path.ends_with(".zst") {
            Self::Zstd
        } else {
            Self::None
        }
    }

    /// Remote program that writes the decompressed content to stdout.
    #[must_use]
    pub const fn reader(&self) -> &'static str {
        match self {
            Self::None => "cat",
            Self::Gzip => "zcat",
            Self::Bzip2 => "bzcat",
            Self::Xz => "xzcat",
            Self::Zstd => "zstd -dc",
        }
    }
}

/// Builds the command printing the (decompressed) content of `path`.
///
/// # Errors
///
/// Returns [`LoghaulError::Quote`](crate::LoghaulError::Quote) if `path`
/// cannot be quoted.
pub fn fetch_command(path: &str) -> Result<String> {
    Ok(format!("{} -- {}", Compression::detect(path).reader(), quote_path(path)?))
}

/// Fetches log file content through a [`RemoteChannel`].
#[derive(Debug)]
pub struct LogFetcher<'a, C> {
    channel: &'a C,
}

impl<'a, C: RemoteChannel> LogFetcher<'a, C> {
    /// Creates a fetcher over `channel`.
    pub const fn new(channel: &'a C) -> Self {
        Self { channel }
    }

    /// Returns the raw lines of `path`, decompressed if its suffix says so.
    ///
    /// # Errors
    ///
    /// Returns the channel's error for a missing or unreadable file or a
    /// failed decompression.
    pub async fn fetch(&self, path: &str) -> Result<Vec<String>> {
        let lines = self.channel.run(&fetch_command(path)?).await?;
        debug!(path = %path, lines = lines.len(), "fetched remote file");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeChannel;
    use test_case::test_case;

    #[test_case("app.log", Compression::None ; "plain")]
    #[test_case("error.log.1", Compression::None ; "rotated plain")]
    #[test_case("error.log.2.gz", Compression::Gzip ; "gzip")]
    #[test_case("error.log.bz2", Compression::Bzip2 ; "bzip2")]
    #[test_case("error.log.xz", Compression::Xz ; "xz")]
    #[test_case("error.log.zst", Compression::Zstd ; "zstd")]
    #[test_case("gz.log", Compression::None ; "gz in name only")]
    fn detects_compression(path: &str, expected: Compression) {
        assert_eq!(Compression::detect(path), expected);
    }

    fn words(path: &str) -> Vec<String> {
        shlex::split(&fetch_command(path).expect("quotable")).expect("well-formed shell words")
    }

    #[test]
    fn command_selects_reader_by_suffix() {
        assert_eq!(words("/logs/a.log"), ["cat", "--", "/logs/a.log"]);
        assert_eq!(words("/logs/a.log.gz"), ["zcat", "--", "/logs/a.log.gz"]);
        assert_eq!(words("email_logs/debug.log"), ["cat", "--", "email_logs/debug.log"]);
        assert_eq!(words("~/logs/b.log.zst"), ["zstd", "-dc", "--", "~/logs/b.log.zst"]);
        assert_eq!(words("/logs/it's.log"), ["cat", "--", "/logs/it's.log"]);
    }

    #[test]
    fn home_relative_path_stays_expandable() {
        let command = fetch_command("~/logs/b.log").expect("quotable");
        assert!(command.starts_with("cat -- ~/"));
    }

    #[tokio::test]
    async fn fetches_lines() {
        let channel = FakeChannel::new().with_file("/logs/a.log.gz", &["{}", "{}"]);
        let lines = LogFetcher::new(&channel)
            .fetch("/logs/a.log.gz")
            .await
            .expect("fetch");
        assert_eq!(lines.len(), 2);
        assert_eq!(channel.calls(), vec![fetch_command("/logs/a.log.gz").expect("quotable")]);
    }

    #[tokio::test]
    async fn missing_file_is_remote_error() {
        let channel = FakeChannel::new();
        let err = LogFetcher::new(&channel)
            .fetch("/logs/missing.log")
            .await
            .expect_err("missing");
        assert!(err.is_remote());
    }
}
