//! POSIX shell quoting for remote command arguments.

use crate::error::{LoghaulError, Result};

/// Quotes `arg` as a single POSIX shell word.
///
/// # Errors
///
/// Returns [`LoghaulError::Quote`] if `arg` contains a NUL byte, which no
/// shell word can carry.
pub fn quote(arg: &str) -> Result<String> {
    shlex::try_quote(arg)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| LoghaulError::Quote(format!("{arg:?}: {e}")))
}

/// Quotes a remote path, leaving a leading `~` or `~/` for the remote shell
/// to expand against the login user's home directory.
///
/// # Errors
///
/// Returns [`LoghaulError::Quote`] if the path cannot be quoted.
pub fn quote_path(path: &str) -> Result<String> {
    if path == "~" {
        return Ok("~".to_string());
    }
    match path.strip_prefix("~/") {
        Some("") => Ok("~/".to_string()),
        Some(rest) => Ok(format!("~/{}", quote(rest)?)),
        None => quote(path),
    }
}
