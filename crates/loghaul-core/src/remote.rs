//! Remote command execution.
//!
//! A [`RemoteChannel`] runs one shell command on a remote host and returns the
//! lines it printed. Every call is independent: [`SshChannel`] spawns a fresh
//! OpenSSH client process per call, which connects, authenticates with a
//! single private key, runs the command and disconnects.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{LoghaulError, Result};

/// Default TCP connect timeout for a remote session.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time a command may run after the connection is established.
pub const DEFAULT_COMMAND_ALLOWANCE: Duration = Duration::from_secs(60);

/// Runs shell commands on a remote host.
pub trait RemoteChannel: Send + Sync {
    /// Runs `command` in a fresh session and returns its standard output lines.
    ///
    /// Whitespace-only output yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`LoghaulError::RemoteExecution`] when the connection,
    /// authentication or session fails, the command exits non-zero, or the
    /// session times out.
    fn run(&self, command: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Connection parameters for one remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    /// Remote host name or address.
    pub host: String,
    /// Remote SSH port.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Private key used as the only identity.
    pub identity: PathBuf,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Command allowance once connected; the session deadline is
    /// `connect_timeout + command_allowance`.
    pub command_allowance: Duration,
}

impl SshTarget {
    /// Creates a target with default timeouts.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        identity: impl AsRef<Path>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            identity: identity.as_ref().to_path_buf(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_allowance: DEFAULT_COMMAND_ALLOWANCE,
        }
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets the command allowance.
    #[must_use]
    pub const fn with_command_allowance(mut self, allowance: Duration) -> Self {
        self.command_allowance = allowance;
        self
    }

    /// Total time a session may take before it is abandoned.
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        self.connect_timeout + self.command_allowance
    }

    /// `user@host` destination string.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// [`RemoteChannel`] backed by the system OpenSSH client.
#[derive(Debug, Clone)]
pub struct SshChannel {
    target: SshTarget,
    program: PathBuf,
}

impl SshChannel {
    /// Creates a channel that invokes `ssh` from `PATH`.
    #[must_use]
    pub fn new(target: SshTarget) -> Self {
        Self {
            target,
            program: PathBuf::from("ssh"),
        }
    }

    /// Uses a specific ssh client binary.
    #[must_use]
    pub fn with_program(mut self, program: impl AsRef<Path>) -> Self {
        self.program = program.as_ref().to_path_buf();
        self
    }

    /// The endpoint this channel connects to.
    #[must_use]
    pub const fn target(&self) -> &SshTarget {
        &self.target
    }

    /// Arguments passed to the ssh client for `command`.
    ///
    /// Authentication is restricted to the configured key and never prompts.
    /// Host keys are accepted without verification.
    #[must_use]
    pub fn ssh_args(&self, command: &str) -> Vec<String> {
        let connect_secs = self.target.connect_timeout.as_secs().max(1);
        vec![
            "-i".to_string(),
            self.target.identity.display().to_string(),
            "-p".to_string(),
            self.target.port.to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "IdentitiesOnly=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={connect_secs}"),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
            self.target.destination(),
            "--".to_string(),
            command.to_string(),
        ]
    }
}

impl RemoteChannel for SshChannel {
    async fn run(&self, command: &str) -> Result<Vec<String>> {
        debug!(
            host = %self.target.host,
            port = self.target.port,
            command = %command,
            "running remote command"
        );

        let child = Command::new(&self.program)
            .args(self.ssh_args(command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                LoghaulError::remote(
                    command,
                    format!("failed to start {}: {e}", self.program.display()),
                )
            })?;

        let session_timeout = self.target.session_timeout();
        let output = timeout(session_timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                LoghaulError::remote(
                    command,
                    format!("session timed out after {}s", session_timeout.as_secs()),
                )
            })?
            .map_err(|e| LoghaulError::remote(command, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or("no diagnostic output");
            let status = output
                .status
                .code()
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit status {c}"));
            return Err(LoghaulError::remote(command, format!("{status}: {detail}")));
        }

        Ok(split_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Splits captured standard output into lines.
///
/// Only line terminators (`\n` or `\r\n`) are removed; line content is kept
/// as is. Trailing blank lines are dropped, so output that is only
/// whitespace yields no lines.
#[must_use]
pub fn split_output(stdout: &str) -> Vec<String> {
    let mut lines: Vec<String> = stdout
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted channel for pipeline tests.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::RemoteChannel;
    use crate::error::{LoghaulError, Result};
    use crate::fetcher::fetch_command;
    use crate::lister::list_command;

    /// Answers commands from a script keyed by the exact command string.
    #[derive(Debug, Default)]
    pub struct FakeChannel {
        outputs: HashMap<String, Vec<String>>,
        delays: HashMap<String, Duration>,
        unreachable: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeChannel {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call fails as if the host refused the connection.
        pub fn unreachable() -> Self {
            Self {
                unreachable: true,
                ..Self::default()
            }
        }

        #[must_use]
        pub fn with_listing(mut self, dir: &str, pattern: &str, paths: &[&str]) -> Self {
            self.outputs.insert(
                list_command(dir, pattern).expect("quotable listing"),
                paths.iter().map(ToString::to_string).collect(),
            );
            self
        }

        #[must_use]
        pub fn with_file(mut self, path: &str, lines: &[&str]) -> Self {
            self.outputs.insert(
                fetch_command(path).expect("quotable path"),
                lines.iter().map(ToString::to_string).collect(),
            );
            self
        }

        #[must_use]
        pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
            self.delays.insert(fetch_command(path).expect("quotable path"), delay);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl RemoteChannel for FakeChannel {
        async fn run(&self, command: &str) -> Result<Vec<String>> {
            self.calls.lock().expect("lock").push(command.to_string());
            if let Some(delay) = self.delays.get(command) {
                tokio::time::sleep(*delay).await;
            }
            if self.unreachable {
                return Err(LoghaulError::remote(command, "connection refused"));
            }
            self.outputs
                .get(command)
                .cloned()
                .ok_or_else(|| LoghaulError::remote(command, "exit status 1: No such file or directory"))
        }
    }
}
