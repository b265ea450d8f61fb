// ABOUTME: Application-wide error types for blue-green.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::args::ArgumentError;
use crate::channel::ChannelError;
use crate::deploy::DeployError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
