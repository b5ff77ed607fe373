//! ECS Components
//!
//! Components shared by every agent, plus the citizen and propagandist state records.

pub mod agent;
pub mod citizen;
pub mod propagandist;

pub use agent::*;
pub use citizen::*;
pub use propagandist::*;
