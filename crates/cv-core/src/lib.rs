//! Civil Violence Simulation Engine
//!
//! Agent-based model of civil violence on a grid: citizens weigh grievance
//! against the risk of arrest, cops jail active citizens and exposed
//! propagandists, and propagandists push grievance or perceived risk through
//! one configurable influence model.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod model;
pub mod output;
pub mod propaganda;
pub mod scheduler;
pub mod setup;
pub mod systems;

pub use clock::SimulationClock;
pub use components::*;
pub use config::{ModelParams, PropagandaParams, DEFAULT_CONFIG_PATH};
pub use error::{ConfigError, GridError, SimError};
pub use events::{EventLogger, StepEvents};
pub use grid::SpatialGrid;
pub use model::Model;
pub use output::{write_report, DataCollector};
pub use propaganda::{GrievanceUpdate, PropagandaEngine, PropagandaStrategy};
pub use scheduler::RandomActivation;
pub use setup::AgentSpec;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
