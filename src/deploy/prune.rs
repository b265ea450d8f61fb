// ABOUTME: Pruning of archived generations beyond the retention count.
// ABOUTME: Runs only after a successful cutover; failures become warnings.

use crate::channel::CommandChannel;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::types::{AppName, Generation};

use super::blue_green::BlueGreen;

/// Archives to delete so that only the newest `retain` remain.
///
/// `generations` must be sorted oldest first.
pub fn excess_generations(generations: &[Generation], retain: usize) -> &[Generation] {
    let excess = generations.len().saturating_sub(retain);
    &generations[..excess]
}

impl<C: CommandChannel> BlueGreen<C> {
    /// Delete archives of `app` beyond the configured retention.
    ///
    /// Returns the generations actually deleted. Without a retention count
    /// nothing is touched.
    pub(crate) async fn prune(
        &self,
        app: &AppName,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> Vec<Generation> {
        let Some(retain) = self.retain else {
            return Vec::new();
        };

        let generations = match self.repo.list_generations(app).await {
            Ok(generations) => generations,
            Err(e) => {
                diag.warn(Warning::prune(format!(
                    "could not list archives of {app} for pruning: {e}"
                )));
                return Vec::new();
            }
        };

        let mut pruned = Vec::new();
        for &generation in excess_generations(&generations, retain.get()) {
            let name = app.generation_name(generation);
            output.progress(&format!("  → Deleting old archive {name}..."));

            match self.repo.delete_application(&name).await {
                Ok(()) => pruned.push(generation),
                Err(e) => diag.warn(Warning::prune(format!("failed to delete {name}: {e}"))),
            }
        }

        pruned
    }
}
