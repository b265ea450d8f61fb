// ABOUTME: Blue-green push orchestration on top of the application repository.
// ABOUTME: Decides between first deploy and cutover, then archives and prunes.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use nonempty::NonEmpty;

use crate::args::PushArgs;
use crate::channel::CommandChannel;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::types::{AppName, Generation, Route};

use super::cutover::Cutover;
use super::error::DeployError;
use super::repo::{ApplicationRepo, Archive};
use super::state::Swapped;

/// What a push did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Nothing was serving; the app was pushed straight under its name.
    FirstDeploy { app: AppName },
    /// The previous production app was archived and replaced.
    CutOver {
        app: AppName,
        archived: Generation,
        routes: NonEmpty<Route>,
        pruned: Vec<Generation>,
    },
}

/// What a rollback did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    pub app: AppName,
    pub restored: Generation,
    pub archived: Generation,
    pub routes: NonEmpty<Route>,
}

/// Current deployment record of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub app: AppName,
    /// Whether an application holds the production name.
    pub serving: bool,
    /// Archived generations, newest first.
    pub archived: Vec<Archive>,
}

/// Blue-green orchestrator.
///
/// All state is read from the platform on every call; nothing is cached
/// between operations.
pub struct BlueGreen<C> {
    pub(crate) repo: ApplicationRepo<C>,
    pub(crate) retain: Option<NonZeroUsize>,
    pub(crate) hosts: HashMap<String, String>,
}

impl<C: CommandChannel> BlueGreen<C> {
    pub fn new(channel: C) -> Self {
        Self {
            repo: ApplicationRepo::new(channel),
            retain: None,
            hosts: HashMap::new(),
        }
    }

    /// Keep at most `retain` archived generations after each push.
    pub fn retain(mut self, retain: Option<NonZeroUsize>) -> Self {
        self.retain = retain;
        self
    }

    /// Production host overrides, keyed by logical app name.
    pub fn hosts(mut self, hosts: HashMap<String, String>) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn repo(&self) -> &ApplicationRepo<C> {
        &self.repo
    }

    /// Host name of the production route. Defaults to the app name.
    pub fn host_for<'a>(&'a self, app: &'a AppName) -> &'a str {
        self.hosts
            .get(app.as_str())
            .map(String::as_str)
            .unwrap_or(app.as_str())
    }

    /// Push a new version of `args.app`.
    ///
    /// With nothing deployed, the app is pushed under its own name and
    /// started. Otherwise the new version is pushed next to production,
    /// receives the production routes, and takes over the name while the
    /// previous version is archived.
    ///
    /// # Errors
    ///
    /// A failed push returns before anything that serves traffic is touched,
    /// as does `GenerationsExhausted` when no tag is left for the new version.
    /// Failures during the cutover are returned as-is and not undone.
    pub async fn push(
        &self,
        args: &PushArgs,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> Result<PushOutcome, DeployError> {
        let app = &args.app;

        if !self.repo.does_app_exist(app.as_str()).await? {
            output.progress(&format!("  → No existing {app} (first deploy)"));
            tracing::info!(app = %app, "first deployment");
            self.repo
                .push_application(app.as_str(), &args.manifest, &args.path)
                .await?;
            self.repo.start_application(app.as_str()).await?;
            return Ok(PushOutcome::FirstDeploy { app: app.clone() });
        }

        let generations = self.repo.list_generations(app).await?;
        let exhausted = || DeployError::GenerationsExhausted(app.clone());
        let archive = Generation::after_newest(&generations).ok_or_else(exhausted)?;
        let staged = app.generation_name(archive.next().ok_or_else(exhausted)?);

        output.progress(&format!("  → Pushing new version as {staged}..."));
        tracing::info!(app = %app, staged = %staged, "pushing next to production");
        if let Err(e) = self
            .repo
            .push_application(&staged, &args.manifest, &args.path)
            .await
        {
            tracing::warn!(app = %app, "push failed, production left untouched");
            return Err(e);
        }

        let cutover = Cutover::new(app.clone(), staged, archive, self.host_for(app));

        output.progress(&format!(
            "  → Mapping {} routes onto {}...",
            cutover.host(),
            cutover.incoming()
        ));
        let cutover = cutover.map_route(&self.repo).await?;

        output.progress(&format!(
            "  → Archiving {app} as {}...",
            cutover.archive_name()
        ));
        let cutover = cutover.swap_names(&self.repo).await?;
        let archived = cutover.archive();
        let routes = self.release(cutover, output, diag).await;

        let pruned = self.prune(app, output, diag).await;

        Ok(PushOutcome::CutOver {
            app: app.clone(),
            archived,
            routes,
            pruned,
        })
    }

    /// Unbind the production routes from the archived application.
    ///
    /// The promoted application already serves traffic, so a failure is
    /// recorded as a warning and the cutover still counts as done.
    pub(crate) async fn release(
        &self,
        cutover: Cutover<Swapped>,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> NonEmpty<Route> {
        output.progress(&format!(
            "  → Unmapping routes from {}...",
            cutover.archive_name()
        ));
        match cutover.release_archive(&self.repo).await {
            Ok(released) => released.finish(),
            Err((swapped, e)) => {
                diag.warn(Warning::release(format!(
                    "{} still holds the production routes: {e}",
                    swapped.archive_name()
                )));
                swapped.finish()
            }
        }
    }

    /// Production status and archived generations of `app`.
    pub async fn generations(&self, app: &AppName) -> Result<GenerationReport, DeployError> {
        let serving = self.repo.does_app_exist(app.as_str()).await?;
        let mut archived = self.repo.list_archives(app).await?;
        archived.reverse();

        Ok(GenerationReport {
            app: app.clone(),
            serving,
            archived,
        })
    }
}
