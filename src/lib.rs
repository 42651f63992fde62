pub mod config;
pub mod engine;
pub mod forum;
pub mod orchestrator;
pub mod reddit;
pub mod schedule;
pub mod store;

pub use orchestrator::{RunOrchestrator, RunOutcome, RunReport, RunSettings};
