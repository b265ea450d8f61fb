// ABOUTME: Generations command implementation.
// ABOUTME: Shows which archived versions are available for rollback.

use super::connection::connect;
use blue_green::args::parse_app_arg;
use blue_green::config::Config;
use blue_green::error::Result;
use blue_green::output::Output;

pub async fn generations(config: &Config, argv: &[String], output: Output) -> Result<()> {
    let app = parse_app_arg(argv)?;
    let report = connect(config).generations(&app).await?;

    let status = if report.serving {
        "serving"
    } else {
        "not deployed"
    };
    output.progress(&format!("{app}: {status}"));
    for archive in &report.archived {
        let note = if archive.running { "" } else { "  (stopped)" };
        output.progress(&format!(
            "  {}  {}{note}",
            archive.generation,
            app.generation_name(archive.generation)
        ));
    }

    let tags = |running: bool| -> Vec<String> {
        report
            .archived
            .iter()
            .filter(|archive| archive.running == running)
            .map(|archive| archive.generation.to_string())
            .collect()
    };
    let (running, stopped) = (tags(true), tags(false));

    let mut summary = if running.is_empty() {
        format!("{app} has no running archived generations")
    } else {
        format!("{app} can roll back to {}", running.join(", "))
    };
    if !stopped.is_empty() {
        summary.push_str(&format!(
            "; stopped, never served or stopped by hand: {}",
            stopped.join(", ")
        ));
    }
    output.success(&summary);
    Ok(())
}
