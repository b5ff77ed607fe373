//! Propagandist Step
//!
//! Serve any sentence; otherwise gather bandwagon influence from the quiescent
//! citizens in view, re-evaluate exposure and possibly move.

use bevy_ecs::prelude::*;
use cv_events::EventKind;

use crate::components::{AgentId, Position, Propagandist, Sentence, VisibilityChange, Vision};
use crate::config::ModelParams;
use crate::error::SimError;
use crate::events::StepEvents;

use super::{component, component_mut, serve_sentence, survey, wander};

pub fn step_propagandist(world: &mut World, entity: Entity) -> Result<(), SimError> {
    if serve_sentence(world, entity)? != Sentence::Free {
        return Ok(());
    }

    let id = *component::<AgentId>(world, entity)?;
    let pos = component::<Position>(world, entity)?.0;
    let vision = component::<Vision>(world, entity)?.0;
    let movement = world.resource::<ModelParams>().movement;
    let seen = survey(world, pos, vision)?;

    let change = {
        let mut agent = component_mut::<Propagandist>(world, entity)?;
        if agent.accumulates_influence() {
            agent.accumulate(&seen.quiescent_susceptibilities());
            agent
                .refresh_visibility()
                .map(|change| (change, agent.total_influence))
        } else {
            None
        }
    };

    if let Some((change, total_influence)) = change {
        let kind = match change {
            VisibilityChange::Exposed => {
                tracing::debug!("{} exposed with influence {:.3}", id, total_influence);
                EventKind::Exposed { total_influence }
            }
            VisibilityChange::Concealed => EventKind::Concealed { total_influence },
        };
        world.resource_mut::<StepEvents>().push(id, kind);
    }

    if movement {
        wander(world, entity, pos, &seen.empty)?;
    }
    Ok(())
}
