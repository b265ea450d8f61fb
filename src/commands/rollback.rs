// ABOUTME: Rollback command implementation.
// ABOUTME: Restores a retained generation into the production name.

use super::connection::connect;
use blue_green::args::parse_rollback_args;
use blue_green::config::Config;
use blue_green::diagnostics::{Diagnostics, Warning};
use blue_green::error::Result;
use blue_green::output::{Output, OutputMode};

/// Roll an application back to a retained generation.
pub async fn rollback(config: &Config, argv: &[String], mut output: Output) -> Result<()> {
    let args = parse_rollback_args(argv)?;

    output.start_timer();
    let mut diag = Diagnostics::default();
    let orchestrator = connect(config);

    output.progress(&format!("Rolling {} back to {}", args.app, args.version));

    let outcome = orchestrator.rollback(&args, &output, &mut diag).await?;

    if output.mode() == OutputMode::Normal {
        if let Err(e) = orchestrator.repo().list_applications().await {
            diag.warn(Warning::listing(format!("listing applications failed: {e}")));
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success(&format!(
        "Rolled {} back to {}; replaced version kept as {}",
        outcome.app,
        outcome.restored,
        outcome.app.generation_name(outcome.archived)
    ));
    Ok(())
}
