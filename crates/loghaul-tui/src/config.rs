//! Command-line and environment configuration.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use loghaul_core::{AggregatorOptions, LoghaulError, Origin, OriginSpec, Result, SshChannel, SshTarget};

/// Origin tag of the email service log.
pub const EMAIL_ORIGIN: &str = "email";

/// Origin tag of the web frontend error logs.
pub const NEXTJS_ORIGIN: &str = "nextjs";

/// loghaul - merged, filterable view of remote structured logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "loghaul")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Remote host serving both log origins.
    #[arg(long, env = "SSH_HOST", default_value = "localhost")]
    pub host: String,

    /// Remote login user.
    #[arg(long, env = "SSH_USER", default_value = "root")]
    pub user: String,

    /// Private key used for authentication.
    #[arg(long, env = "SSH_KEY", default_value = "~/.ssh/id_rsa")]
    pub key: String,

    /// SSH port of the email service host.
    #[arg(long, env = "EMAIL_LOG_PORT")]
    pub email_port: u16,

    /// Remote path of the email service log.
    #[arg(long, env = "EMAIL_LOG_PATH", default_value = "email_logs/debug.log")]
    pub email_log_path: String,

    /// SSH port of the web frontend host.
    #[arg(long, env = "NEXTJS_LOG_PORT")]
    pub nextjs_port: u16,

    /// Remote directory holding the web frontend error logs.
    #[arg(long, env = "NEXTJS_LOG_DIR", default_value = "~/logs")]
    pub nextjs_log_dir: String,

    /// Filename glob selecting web frontend error logs.
    #[arg(long, env = "NEXTJS_LOG_PATTERN", default_value = "error*.log*")]
    pub nextjs_log_pattern: String,

    /// Known log file names (informational; discovery uses the pattern).
    #[arg(long, env = "NEXTJS_LOG_FILES", value_delimiter = ',')]
    pub nextjs_log_files: Vec<String>,

    /// SSH connect timeout in seconds.
    #[arg(long, env = "LOGHAUL_CONNECT_TIMEOUT", default_value_t = 5)]
    pub connect_timeout: u64,

    /// Files fetched concurrently per origin.
    #[arg(long, env = "LOGHAUL_MAX_PARALLEL", default_value_t = 4)]
    pub max_parallel: usize,

    /// Overall acquisition deadline in seconds.
    #[arg(long, env = "LOGHAUL_DEADLINE")]
    pub deadline: Option<u64>,
}

/// Connection settings of one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginConfig {
    /// Origin tag.
    pub tag: &'static str,
    /// SSH port.
    pub port: u16,
    /// Where the origin's files live.
    pub spec: OriginSpec,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote host.
    pub host: String,
    /// Remote user.
    pub user: String,
    /// Private key path with `~` expanded.
    pub identity: PathBuf,
    /// Email service origin.
    pub email: OriginConfig,
    /// Web frontend origin.
    pub nextjs: OriginConfig,
    /// Known web frontend log file names.
    pub nextjs_log_files: Vec<String>,
    /// SSH connect timeout.
    pub connect_timeout: Duration,
    /// Acquisition tuning.
    pub options: AggregatorOptions,
}

impl Cli {
    /// Validates the parsed arguments, resolving `~` against `HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`LoghaulError::Config`] if a value is out of range or the key
    /// path needs `HOME` and it is unset.
    pub fn into_config(self) -> Result<Config> {
        self.into_config_with_home(std::env::var_os("HOME"))
    }

    fn into_config_with_home(self, home: Option<OsString>) -> Result<Config> {
        if self.email_port == 0 {
            return Err(LoghaulError::Config("email port must be non-zero".to_string()));
        }
        if self.nextjs_port == 0 {
            return Err(LoghaulError::Config("nextjs port must be non-zero".to_string()));
        }
        if self.max_parallel == 0 {
            return Err(LoghaulError::Config("max parallel fetches must be at least 1".to_string()));
        }
        if self.connect_timeout == 0 {
            return Err(LoghaulError::Config("connect timeout must be at least 1 second".to_string()));
        }

        let identity = expand_home(&self.key, home)?;

        Ok(Config {
            host: self.host,
            user: self.user,
            identity,
            email: OriginConfig {
                tag: EMAIL_ORIGIN,
                port: self.email_port,
                spec: OriginSpec::fixed(EMAIL_ORIGIN, self.email_log_path),
            },
            nextjs: OriginConfig {
                tag: NEXTJS_ORIGIN,
                port: self.nextjs_port,
                spec: OriginSpec::discovered(NEXTJS_ORIGIN, self.nextjs_log_dir, self.nextjs_log_pattern),
            },
            nextjs_log_files: self
                .nextjs_log_files
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            options: AggregatorOptions {
                max_parallel_fetches: self.max_parallel,
                deadline: self.deadline.map(Duration::from_secs),
            },
        })
    }
}

impl Config {
    /// Origin tags in number-key order.
    #[must_use]
    pub fn origin_tags(&self) -> Vec<String> {
        vec![self.email.tag.to_string(), self.nextjs.tag.to_string()]
    }

    /// SSH target for `port` on the configured host.
    #[must_use]
    pub fn target(&self, port: u16) -> SshTarget {
        SshTarget::new(&self.host, port, &self.user, &self.identity)
            .with_connect_timeout(self.connect_timeout)
    }

    /// Both origins, each on its own channel.
    #[must_use]
    pub fn origins(&self) -> Vec<Origin<SshChannel>> {
        [&self.email, &self.nextjs]
            .into_iter()
            .map(|origin| {
                Origin::new(
                    origin.spec.clone(),
                    SshChannel::new(self.target(origin.port)),
                )
            })
            .collect()
    }
}

fn expand_home(path: &str, home: Option<OsString>) -> Result<PathBuf> {
    let rest = if path == "~" {
        ""
    } else if let Some(rest) = path.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(path));
    };

    let home = home
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LoghaulError::Config(format!("cannot expand {path}: HOME is not set")))?;
    Ok(PathBuf::from(home).join(rest))
}
