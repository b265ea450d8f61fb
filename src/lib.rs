// ABOUTME: Library root for blue-green - exposes the orchestrator for testing.
// ABOUTME: The main binary is in main.rs.

pub mod args;
pub mod channel;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod types;
