// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Logical app names, generation tags, routes, and platform GUIDs.

mod app_name;
mod generation;
mod id;
mod route;

pub use app_name::{AppName, AppNameError};
pub use generation::{Generation, GenerationError};
pub use id::{AppGuid, SpaceGuid};
pub use route::Route;
