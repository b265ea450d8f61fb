// ABOUTME: Generic cutover struct parameterized by state marker.
// ABOUTME: Moves the production name from one concrete application to another.

use crate::types::{AppName, Generation};

use super::state::Staged;

/// A cutover in progress, parameterized by its current state.
///
/// Push and rollback both end in the same sequence: map the production
/// routes onto the incoming application, then archive the outgoing one and
/// promote the incoming one. Renames are only reachable from `RouteMapped`,
/// so the production name can never lose its routes mid-cutover:
///
/// ```compile_fail
/// use blue_green::channel::CommandChannel;
/// use blue_green::deploy::{ApplicationRepo, Cutover, Staged};
///
/// async fn rename_first<C: CommandChannel>(cutover: Cutover<Staged>, repo: &ApplicationRepo<C>) {
///     let _ = cutover.swap_names(repo).await;
/// }
/// ```
#[derive(Debug)]
pub struct Cutover<S> {
    pub(crate) app: AppName,
    pub(crate) incoming: String,
    pub(crate) archive: Generation,
    pub(crate) host: String,
    pub(crate) state: S,
}

impl Cutover<Staged> {
    /// Prepare to promote `incoming` to `app`, archiving the current
    /// production application as `archive`. `host` selects which of the
    /// production routes are carried over.
    pub fn new(
        app: AppName,
        incoming: impl Into<String>,
        archive: Generation,
        host: impl Into<String>,
    ) -> Self {
        Cutover {
            app,
            incoming: incoming.into(),
            archive,
            host: host.into(),
            state: Staged,
        }
    }
}

impl<S> Cutover<S> {
    pub fn app(&self) -> &AppName {
        &self.app
    }

    /// Concrete name of the application being promoted.
    pub fn incoming(&self) -> &str {
        &self.incoming
    }

    /// Generation the outgoing production application is archived under.
    pub fn archive(&self) -> Generation {
        self.archive
    }

    /// Concrete name the outgoing production application is archived under.
    pub fn archive_name(&self) -> String {
        self.app.generation_name(self.archive)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}
