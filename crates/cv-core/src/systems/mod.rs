//! Agent Systems
//!
//! Per-agent step rules. Agents step one at a time in activation order, each
//! with exclusive access to the world, so later agents see earlier agents'
//! moves and arrests within the same step.

pub mod citizen;
pub mod cop;
pub mod jail;
pub mod movement;
pub mod perception;
pub mod propagandist;

use bevy_ecs::prelude::*;
use cv_events::AgentClass;

use crate::components::ClassTag;
use crate::error::SimError;
use crate::propaganda::PropagandaEngine;

pub use citizen::step_citizen;
pub use cop::step_cop;
pub use jail::{arrest, serve_sentence};
pub use movement::{relocate, wander};
pub use perception::{survey, Neighbor, NeighborKind, Neighborhood};
pub use propagandist::step_propagandist;

/// Run one agent's step rule, dispatched on its class tag.
pub fn step_agent(
    world: &mut World,
    entity: Entity,
    engine: &PropagandaEngine,
) -> Result<(), SimError> {
    match component::<ClassTag>(world, entity)?.0 {
        AgentClass::Population => step_citizen(world, entity, engine),
        AgentClass::Cop => step_cop(world, entity),
        AgentClass::Propaganda => step_propagandist(world, entity),
    }
}

pub(crate) fn component<T: Component>(world: &World, entity: Entity) -> Result<&T, SimError> {
    world.get::<T>(entity).ok_or(SimError::MissingComponent {
        entity,
        component: std::any::type_name::<T>(),
    })
}

pub(crate) fn component_mut<T: Component>(
    world: &mut World,
    entity: Entity,
) -> Result<Mut<'_, T>, SimError> {
    world.get_mut::<T>(entity).ok_or(SimError::MissingComponent {
        entity,
        component: std::any::type_name::<T>(),
    })
}
