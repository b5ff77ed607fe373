//! Shared record types and serialization for the civil violence model.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine produces these records; anything that consumes a run (reports,
//! plots, replay checks) reads them.

pub mod agent;
pub mod event;
pub mod metrics;
pub mod report;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use agent::{AgentClass, GridPos};
pub use event::{generate_event_id, EventKind, SimEvent};
pub use metrics::{AgentReport, StepMetrics};
pub use report::RunReport;
