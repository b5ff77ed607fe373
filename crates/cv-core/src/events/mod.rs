//! Event Recording
//!
//! Per-step event buffer and the JSONL event log.

pub mod logger;

pub use logger::{EventLogger, StepEvents};
