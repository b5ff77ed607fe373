//! Movement
//!
//! Relocation of an agent between grid cells.

use bevy_ecs::prelude::*;
use cv_events::GridPos;
use rand::seq::SliceRandom;

use crate::components::Position;
use crate::error::SimError;
use crate::grid::SpatialGrid;
use crate::SimRng;

use super::component_mut;

/// Move an agent into an empty cell, keeping grid and `Position` in step.
pub fn relocate(
    world: &mut World,
    entity: Entity,
    from: GridPos,
    to: GridPos,
) -> Result<(), SimError> {
    world.resource_mut::<SpatialGrid>().move_agent(from, to)?;
    component_mut::<Position>(world, entity)?.0 = to;
    Ok(())
}

/// Move to one of `empty` chosen uniformly at random. Returns the new cell.
pub fn wander(
    world: &mut World,
    entity: Entity,
    from: GridPos,
    empty: &[GridPos],
) -> Result<Option<GridPos>, SimError> {
    let target = {
        let mut rng = world.resource_mut::<SimRng>();
        empty.choose(&mut rng.0).copied()
    };
    let Some(to) = target else {
        return Ok(None);
    };
    relocate(world, entity, from, to)?;
    Ok(Some(to))
}
