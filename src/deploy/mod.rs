// ABOUTME: Blue-green deployment orchestration.
// ABOUTME: Exports the application repository, cutover state machine, and orchestrator.

mod blue_green;
mod cutover;
mod error;
mod prune;
mod repo;
mod rollback;
mod state;
mod transitions;

pub use blue_green::{BlueGreen, GenerationReport, PushOutcome, RollbackOutcome};
pub use cutover::Cutover;
pub use error::{DeployError, DeployErrorKind, MalformedResponse};
pub use prune::excess_generations;
pub use repo::{ApplicationRepo, Archive, escape_query};
pub use state::{Released, RouteMapped, Staged, Swapped};
pub use transitions::TransitionResult;
