//! Citizen Step
//!
//! The population agent rule: serve any sentence, look around, weigh
//! grievance against net risk, then possibly move.

use bevy_ecs::prelude::*;
use cv_events::EventKind;

use crate::components::{
    arrest_probability, cop_to_active_ratio, net_risk, ActivationChange, AgentId, Citizen,
    Position, Sentence, Vision,
};
use crate::config::ModelParams;
use crate::error::SimError;
use crate::events::StepEvents;
use crate::propaganda::{Exposure, Influence, PropagandaEngine};

use super::{component, component_mut, serve_sentence, survey, wander};

pub fn step_citizen(
    world: &mut World,
    entity: Entity,
    engine: &PropagandaEngine,
) -> Result<(), SimError> {
    if serve_sentence(world, entity)? != Sentence::Free {
        return Ok(());
    }

    let id = *component::<AgentId>(world, entity)?;
    let pos = component::<Position>(world, entity)?.0;
    let vision = component::<Vision>(world, entity)?.0;
    let (k, movement) = {
        let params = world.resource::<ModelParams>();
        (params.arrest_prob_constant, params.movement)
    };

    let seen = survey(world, pos, vision)?;
    let cops = seen.cop_count();
    let ratio = cop_to_active_ratio(cops, 1 + seen.active_count());
    let p_arrest = arrest_probability(k, ratio);
    let propagandists = seen.propagandists();

    let change = {
        let mut citizen = component_mut::<Citizen>(world, entity)?;
        let exposure = Exposure {
            observer: pos,
            susceptibility: citizen.susceptibility,
            cops_in_vision: cops,
            propagandists: &propagandists,
        };
        let mut exposures = citizen.propaganda_exposures;
        let influence = engine.influence(&exposure, &mut exposures);
        citizen.propaganda_exposures = exposures;
        if let Influence::Grievance { effect } = influence {
            citizen.grievance = engine.updated_grievance(citizen.grievance, effect);
        }

        citizen.arrest_probability = Some(p_arrest);
        citizen.net_risk = net_risk(citizen.risk_aversion, p_arrest) / influence.risk_divisor();
        citizen
            .update_activation()
            .map(|change| (change, citizen.grievance, citizen.net_risk))
    };

    if let Some((change, grievance, net_risk)) = change {
        let kind = match change {
            ActivationChange::Activated => EventKind::Activated { grievance, net_risk },
            ActivationChange::Quiesced => EventKind::Quiesced { grievance, net_risk },
        };
        world.resource_mut::<StepEvents>().push(id, kind);
    }

    if movement {
        wander(world, entity, pos, &seen.empty)?;
    }
    Ok(())
}
