//! Cop Step
//!
//! Arrest an exposed propagandist if one is in view, otherwise an active
//! citizen, otherwise wander.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;

use crate::components::{AgentId, Position, Vision};
use crate::config::ModelParams;
use crate::error::SimError;
use crate::SimRng;

use super::{arrest, component, relocate, survey, wander, Neighbor};

pub fn step_cop(world: &mut World, entity: Entity) -> Result<(), SimError> {
    let id = *component::<AgentId>(world, entity)?;
    let pos = component::<Position>(world, entity)?.0;
    let vision = component::<Vision>(world, entity)?.0;
    let movement = world.resource::<ModelParams>().movement;

    let seen = survey(world, pos, vision)?;
    let exposed = seen.exposed_propagandists();
    let candidates = if exposed.is_empty() {
        seen.active_citizens()
    } else {
        exposed
    };

    let target: Option<Neighbor> = {
        let mut rng = world.resource_mut::<SimRng>();
        candidates.choose(&mut rng.0).map(|&&n| n)
    };

    match target {
        Some(target) => {
            let vacated = arrest(world, id, &target)?;
            if movement {
                relocate(world, entity, pos, vacated)?;
            }
        }
        None if movement => {
            wander(world, entity, pos, &seen.empty)?;
        }
        None => {}
    }
    Ok(())
}
