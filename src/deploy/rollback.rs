// ABOUTME: Rollback to a retained generation of an application.
// ABOUTME: Routes the target first, then swaps it into the production name.

use crate::args::RollbackArgs;
use crate::channel::CommandChannel;
use crate::diagnostics::Diagnostics;
use crate::output::Output;
use crate::types::Generation;

use super::blue_green::{BlueGreen, RollbackOutcome};
use super::cutover::Cutover;
use super::error::DeployError;

impl<C: CommandChannel> BlueGreen<C> {
    /// Roll `args.app` back to the archived generation `args.version`.
    ///
    /// This function:
    /// 1. Verifies `<app>-<version>` exists
    /// 2. Verifies something holds the production name
    /// 3. Maps the production routes onto the target
    /// 4. Archives production under a fresh tag and promotes the target
    /// 5. Unbinds the production routes from the archived version
    ///
    /// Nothing is deleted: the superseded version stays available as an
    /// archive, so a rollback can itself be rolled back.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVersion`, `NoProductionApp` or `GenerationsExhausted`
    /// before any mutation.
    pub async fn rollback(
        &self,
        args: &RollbackArgs,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> Result<RollbackOutcome, DeployError> {
        let app = &args.app;
        let target = app.generation_name(args.version);

        if !self.repo.does_app_exist(&target).await? {
            return Err(DeployError::UnknownVersion {
                app: app.clone(),
                version: args.version,
            });
        }

        if !self.repo.does_app_exist(app.as_str()).await? {
            return Err(DeployError::NoProductionApp(app.clone()));
        }

        let generations = self.repo.list_generations(app).await?;
        let archive = Generation::after_newest(&generations)
            .ok_or_else(|| DeployError::GenerationsExhausted(app.clone()))?;
        tracing::info!(app = %app, target = %target, archive = %archive, "rolling back");

        let cutover = Cutover::new(app.clone(), target, archive, self.host_for(app));

        output.progress(&format!(
            "  → Mapping {} routes onto {}...",
            cutover.host(),
            cutover.incoming()
        ));
        let cutover = cutover.map_route(&self.repo).await?;

        output.progress(&format!(
            "  → Archiving {app} as {} and restoring {}...",
            cutover.archive_name(),
            args.version
        ));
        let cutover = cutover.swap_names(&self.repo).await?;
        let archived = cutover.archive();
        let routes = self.release(cutover, output, diag).await;

        Ok(RollbackOutcome {
            app: app.clone(),
            restored: args.version,
            archived,
            routes,
        })
    }
}
