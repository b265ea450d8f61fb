// ABOUTME: Command module aggregator for the blue-green CLI.
// ABOUTME: Re-exports push, rollback, and generations command handlers.

mod connection;
mod generations;
mod push;
mod rollback;

pub use generations::generations;
pub use push::push;
pub use rollback::rollback;
