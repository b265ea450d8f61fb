// ABOUTME: Host command channel used to drive the platform.
// ABOUTME: Defines the CommandChannel trait and its cf CLI implementation.

mod cf;
mod error;

pub use cf::{CfCli, cli_config_path, route_from_v3};
pub use error::{ChannelError, ChannelErrorKind};

use crate::types::{Route, SpaceGuid};
use async_trait::async_trait;

/// Capability to run platform commands and read platform state.
///
/// Every call blocks the caller until the platform answers. Implementations
/// must not retry: each command can have a side effect on the platform.
///
/// A command the platform refuses should be reported as
/// `ChannelError::CommandFailed` when only a process exit status is known, or
/// as `ChannelError::rejected(message)` when the platform's message is.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Run a command, echoing its output to the terminal.
    async fn run_command(&self, args: &[String]) -> Result<Vec<String>, ChannelError>;

    /// Run a command whose output is parsed rather than shown.
    async fn run_command_quietly(&self, args: &[String]) -> Result<Vec<String>, ChannelError>;

    /// The space that application queries are scoped to.
    async fn current_scope(&self) -> Result<SpaceGuid, ChannelError>;

    /// Routes currently bound to the named application.
    async fn get_application_details(&self, name: &str) -> Result<Vec<Route>, ChannelError>;
}
