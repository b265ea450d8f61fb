// ABOUTME: Cutover state marker types for the type state pattern.
// ABOUTME: Route-bearing states carry the routes they mapped.

use nonempty::NonEmpty;

use crate::types::Route;

/// Incoming application exists next to production; nothing routed yet.
/// Available actions: `map_route()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Staged;

/// Production routes are mapped onto the incoming application as well.
/// Available actions: `swap_names()`
#[derive(Debug, Clone)]
pub struct RouteMapped {
    pub(crate) routes: NonEmpty<Route>,
}

/// Incoming application holds the production name; outgoing one is archived
/// but still bound to the production routes.
/// Available actions: `release_archive()`, `finish()`
#[derive(Debug, Clone)]
pub struct Swapped {
    pub(crate) routes: NonEmpty<Route>,
}

/// Production routes are bound to the promoted application only.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Released {
    pub(crate) routes: NonEmpty<Route>,
}
