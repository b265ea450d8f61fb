// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers host command failures, malformed responses, and rollback targets.

use crate::channel::ChannelError;
use crate::types::{AppName, Generation};

/// Errors that can occur while pushing, cutting over, or rolling back.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The host command channel reported a failure. Shown verbatim.
    #[error(transparent)]
    HostCommand(#[from] ChannelError),

    /// A query answered with data that could not be interpreted.
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),

    /// Rollback target does not exist.
    #[error("unknown version {version} of {app}: no application named {app}-{version}")]
    UnknownVersion { app: AppName, version: Generation },

    /// Rollback requested while nothing holds the production name.
    #[error("{0} is not deployed, nothing to roll back from")]
    NoProductionApp(AppName),

    /// No tag is left to archive or stage under.
    #[error("{0} has used up every generation tag; delete or rename its archives")]
    GenerationsExhausted(AppName),

    /// The application has no route with the production host.
    #[error("{app} has no route with host {host}")]
    RouteNotFound { app: String, host: String },
}

/// Ways a structured query response can be unusable.
#[derive(Debug, thiserror::Error)]
pub enum MalformedResponse {
    #[error("invalid JSON in api response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing {0} from api response")]
    MissingField(&'static str),

    #[error("{field} didn't have a number {value}")]
    NotANumber { field: &'static str, value: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    HostCommand,
    MalformedResponse,
    UnknownVersion,
    NoProductionApp,
    GenerationsExhausted,
    RouteNotFound,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::HostCommand(_) => DeployErrorKind::HostCommand,
            DeployError::MalformedResponse(_) => DeployErrorKind::MalformedResponse,
            DeployError::UnknownVersion { .. } => DeployErrorKind::UnknownVersion,
            DeployError::NoProductionApp(_) => DeployErrorKind::NoProductionApp,
            DeployError::GenerationsExhausted(_) => DeployErrorKind::GenerationsExhausted,
            DeployError::RouteNotFound { .. } => DeployErrorKind::RouteNotFound,
        }
    }
}
