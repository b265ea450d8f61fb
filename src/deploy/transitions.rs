// ABOUTME: State transition methods for the production cutover.
// ABOUTME: Each method consumes self and returns the next state on success.

use nonempty::NonEmpty;

use crate::channel::CommandChannel;
use crate::types::Route;

use super::cutover::Cutover;
use super::error::DeployError;
use super::repo::ApplicationRepo;
use super::state::{Released, RouteMapped, Staged, Swapped};

/// Result type for transitions whose failure leaves the previous state usable.
pub type TransitionResult<T, S> = Result<Cutover<T>, (Cutover<S>, DeployError)>;

impl<S> Cutover<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Cutover<T> {
        Cutover {
            app: self.app,
            incoming: self.incoming,
            archive: self.archive,
            host: self.host,
            state,
        }
    }
}

// =============================================================================
// Staged -> RouteMapped
// =============================================================================

impl Cutover<Staged> {
    /// Map the production routes onto the incoming application.
    ///
    /// Routes are discovered on the application that currently holds the
    /// production name. Both applications serve the route afterwards.
    ///
    /// # Errors
    ///
    /// Returns `RouteNotFound` if production has no route for the host, or the
    /// channel error of the failing `map-route`. Nothing has been renamed yet.
    #[must_use = "cutover state must be used"]
    pub async fn map_route<C: CommandChannel>(
        self,
        repo: &ApplicationRepo<C>,
    ) -> Result<Cutover<RouteMapped>, DeployError> {
        let routes = repo
            .map_route_from(self.app.as_str(), &self.incoming, &self.host)
            .await?;
        Ok(self.transition(RouteMapped { routes }))
    }
}

// =============================================================================
// RouteMapped -> Swapped
// =============================================================================

impl Cutover<RouteMapped> {
    /// Archive the outgoing application, then give its name to the incoming one.
    ///
    /// # Errors
    ///
    /// A failure here is not undone. Both applications still hold the
    /// production route, so traffic keeps flowing while an operator repairs
    /// the names.
    #[must_use = "cutover state must be used"]
    pub async fn swap_names<C: CommandChannel>(
        self,
        repo: &ApplicationRepo<C>,
    ) -> Result<Cutover<Swapped>, DeployError> {
        let production = self.app.as_str();
        let archive_name = self.archive_name();

        if let Err(e) = repo.rename_application(production, &archive_name).await {
            tracing::error!(
                app = production,
                incoming = %self.incoming,
                "archiving failed after route mapping; both applications serve traffic"
            );
            return Err(e);
        }

        if let Err(e) = repo.rename_application(&self.incoming, production).await {
            tracing::error!(
                app = production,
                archived = %archive_name,
                incoming = %self.incoming,
                "promotion failed; rename {} to {} to restore the production name",
                self.incoming,
                production
            );
            return Err(e);
        }

        let routes = self.state.routes.clone();
        Ok(self.transition(Swapped { routes }))
    }

    /// Routes now shared by both applications.
    pub fn routes(&self) -> &NonEmpty<Route> {
        &self.state.routes
    }
}

// =============================================================================
// Swapped -> Released
// =============================================================================

impl Cutover<Swapped> {
    /// Unbind the production routes from the archived application.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure. The promoted application is already
    /// serving, so the caller can still `finish()`.
    #[must_use = "cutover state must be used"]
    pub async fn release_archive<C: CommandChannel>(
        self,
        repo: &ApplicationRepo<C>,
    ) -> TransitionResult<Released, Swapped> {
        let archive_name = self.archive_name();

        for route in self.state.routes.iter() {
            if let Err(e) = repo.unmap_route(&archive_name, route).await {
                return Err((self, e));
            }
        }

        let routes = self.state.routes.clone();
        Ok(self.transition(Released { routes }))
    }

    /// Routes the promoted application serves.
    pub fn routes(&self) -> &NonEmpty<Route> {
        &self.state.routes
    }

    /// Consume the cutover and return the carried routes.
    pub fn finish(self) -> NonEmpty<Route> {
        self.state.routes
    }
}

// =============================================================================
// Released - Terminal State
// =============================================================================

impl Cutover<Released> {
    /// Routes the promoted application serves.
    pub fn routes(&self) -> &NonEmpty<Route> {
        &self.state.routes
    }

    /// Consume the cutover and return the carried routes.
    pub fn finish(self) -> NonEmpty<Route> {
        self.state.routes
    }
}
