// ABOUTME: Shared helper for building the orchestrator over the cf CLI.
// ABOUTME: Eliminates duplication across push, rollback, and generations commands.

use blue_green::channel::CfCli;
use blue_green::config::Config;
use blue_green::deploy::BlueGreen;

/// Build an orchestrator driving the configured cf executable.
pub fn connect(config: &Config) -> BlueGreen<CfCli> {
    let mut cli = CfCli::new(&config.cf_binary);
    if let Some(home) = &config.cf_home {
        cli = cli.cf_home(home);
    }

    tracing::debug!(binary = %config.cf_binary, "using cf executable");

    BlueGreen::new(cli)
        .retain(config.retain)
        .hosts(config.hosts.clone())
}
