// ABOUTME: Push command implementation.
// ABOUTME: Resolves arguments, runs the blue-green push, and reports the outcome.

use super::connection::connect;
use blue_green::args::parse_args;
use blue_green::config::Config;
use blue_green::deploy::PushOutcome;
use blue_green::diagnostics::{Diagnostics, Warning};
use blue_green::error::Result;
use blue_green::output::{Output, OutputMode};

/// Push a new version of an application with zero downtime.
pub async fn push(config: &Config, argv: &[String], mut output: Output) -> Result<()> {
    // Argument errors surface before any platform command runs.
    let args = parse_args(argv)?;

    output.start_timer();
    let mut diag = Diagnostics::default();
    let orchestrator = connect(config);

    output.progress(&format!(
        "Pushing {} with manifest {}",
        args.app, args.manifest
    ));

    let outcome = orchestrator.push(&args, &output, &mut diag).await?;

    if output.mode() == OutputMode::Normal {
        if let Err(e) = orchestrator.repo().list_applications().await {
            diag.warn(Warning::listing(format!("listing applications failed: {e}")));
        }
    }

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match outcome {
        PushOutcome::FirstDeploy { app } => {
            output.success(&format!("Deployed {app} for the first time"));
        }
        PushOutcome::CutOver {
            app,
            archived,
            routes,
            pruned,
        } => {
            let routes: Vec<String> = routes.iter().map(ToString::to_string).collect();
            let mut message = format!(
                "Deployed {app} on {}; previous version kept as {}",
                routes.join(", "),
                app.generation_name(archived)
            );
            if !pruned.is_empty() {
                let pruned: Vec<String> = pruned.iter().map(ToString::to_string).collect();
                message.push_str(&format!(" (pruned {})", pruned.join(", ")));
            }
            output.success(&message);
        }
    }

    Ok(())
}
