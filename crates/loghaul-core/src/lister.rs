//! Remote log file discovery.

use tracing::debug;

use crate::error::Result;
use crate::remote::RemoteChannel;
use crate::shell::{quote, quote_path};

/// Builds the `find` command listing regular files under `dir` whose name
/// matches the glob `pattern`.
///
/// # Errors
///
/// Returns [`LoghaulError::Quote`](crate::LoghaulError::Quote) if either
/// argument cannot be quoted.
pub fn list_command(dir: &str, pattern: &str) -> Result<String> {
    Ok(format!("find {} -type f -name {}", quote_path(dir)?, quote(pattern)?))
}

/// Lists files on a remote host through a [`RemoteChannel`].
#[derive(Debug)]
pub struct RemoteLister<'a, C> {
    channel: &'a C,
}

impl<'a, C: RemoteChannel> RemoteLister<'a, C> {
    /// Creates a lister over `channel`.
    pub const fn new(channel: &'a C) -> Self {
        Self { channel }
    }

    /// Returns the paths of files under `dir` matching `pattern`, sorted.
    ///
    /// No match is an empty result, not an error. Paths are not checked for
    /// readability.
    ///
    /// # Errors
    ///
    /// Returns a quoting error for unquotable arguments, or the channel's
    /// error if the listing command fails.
    pub async fn list(&self, dir: &str, pattern: &str) -> Result<Vec<String>> {
        let command = list_command(dir, pattern)?;
        let mut paths: Vec<String> = self
            .channel
            .run(&command)
            .await?
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        paths.sort();
        debug!(dir = %dir, pattern = %pattern, count = paths.len(), "listed remote files");
        Ok(paths)
    }
}
