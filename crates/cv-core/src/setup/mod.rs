//! Model Setup
//!
//! Initial placement of agents from density parameters, or from explicit specs.

pub mod agents;

pub use agents::{generate_specs, spawn_agent, AgentSpec, SpawnSummary};
