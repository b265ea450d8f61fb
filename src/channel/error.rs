// ABOUTME: Command channel error types with SNAFU pattern.
// ABOUTME: Separates process, session, and response failures for programmatic handling.

use snafu::Snafu;
use std::path::PathBuf;

/// Failure reported by the host command channel.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ChannelError {
    #[snafu(display("failed to run {program}: {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` failed with exit code {code}: {message}"))]
    CommandFailed {
        command: String,
        code: i32,
        message: String,
    },

    /// The platform refused the command. The message is shown as-is.
    ///
    /// `CfCli` reports non-zero exits as `CommandFailed` because it only sees
    /// an exit code and output lines. Channels that talk to the platform
    /// directly, and in-memory channels, return this variant with the
    /// platform's own error text.
    #[snafu(display("{message}"))]
    Rejected { message: String },

    #[snafu(display("no space targeted, run `cf target -s <space>` first"))]
    NoTargetedSpace,

    #[snafu(display("cannot locate the cf CLI config: neither CF_HOME nor HOME is set"))]
    NoHomeDirectory,

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("unexpected response from `{command}`: {source}"))]
    UnexpectedOutput {
        command: String,
        source: serde_json::Error,
    },

    #[snafu(display("application not found: {name}"))]
    AppNotFound { name: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelErrorKind {
    /// The command could not be started.
    Execution,
    /// The platform ran the command and reported a failure.
    Platform,
    /// No usable CLI session (home, config, or targeted space).
    Session,
    /// The platform answered with something that could not be read.
    Response,
}

impl ChannelError {
    /// Build a platform rejection carrying a verbatim message.
    pub fn rejected(message: impl Into<String>) -> Self {
        ChannelError::Rejected {
            message: message.into(),
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ChannelErrorKind {
        match self {
            ChannelError::Spawn { .. } => ChannelErrorKind::Execution,
            ChannelError::CommandFailed { .. }
            | ChannelError::Rejected { .. }
            | ChannelError::AppNotFound { .. } => ChannelErrorKind::Platform,
            ChannelError::NoTargetedSpace
            | ChannelError::NoHomeDirectory
            | ChannelError::ReadConfig { .. }
            | ChannelError::ParseConfig { .. } => ChannelErrorKind::Session,
            ChannelError::UnexpectedOutput { .. } => ChannelErrorKind::Response,
        }
    }
}
