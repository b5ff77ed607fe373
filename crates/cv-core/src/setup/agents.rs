//! Agent Spawning
//!
//! Agent specs, their random generation from densities, and spawning them
//! into the world and onto the grid.

use bevy_ecs::prelude::*;
use cv_events::{AgentClass, GridPos};
use rand::Rng;

use crate::components::{AgentId, Citizen, ClassTag, Cop, JailTerm, Position, Propagandist, Vision};
use crate::config::ModelParams;
use crate::error::SimError;
use crate::grid::SpatialGrid;

/// Everything needed to create one agent. Model-wide values (legitimacy,
/// threshold, vision, strategy) come from `ModelParams` at spawn time.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub class: AgentClass,
    pub pos: GridPos,
    pub hardship: f64,
    pub risk_aversion: f64,
    pub susceptibility: f64,
    pub influence: f64,
    pub active: bool,
}

impl AgentSpec {
    fn new(class: AgentClass, pos: GridPos) -> Self {
        Self {
            class,
            pos,
            hardship: 0.5,
            risk_aversion: 0.5,
            susceptibility: 0.5,
            influence: 0.5,
            active: false,
        }
    }

    pub fn citizen(pos: GridPos) -> Self {
        Self::new(AgentClass::Population, pos)
    }

    pub fn cop(pos: GridPos) -> Self {
        Self::new(AgentClass::Cop, pos)
    }

    pub fn propagandist(pos: GridPos) -> Self {
        Self::new(AgentClass::Propaganda, pos)
    }

    pub fn with_hardship(mut self, hardship: f64) -> Self {
        self.hardship = hardship;
        self
    }

    pub fn with_risk_aversion(mut self, risk_aversion: f64) -> Self {
        self.risk_aversion = risk_aversion;
        self
    }

    pub fn with_susceptibility(mut self, susceptibility: f64) -> Self {
        self.susceptibility = susceptibility;
        self
    }

    pub fn with_influence(mut self, influence: f64) -> Self {
        self.influence = influence;
        self
    }

    /// Start the citizen already active.
    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }
}

/// Agent counts produced by setup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub citizens: usize,
    pub cops: usize,
    pub propagandists: usize,
}

impl SpawnSummary {
    pub fn from_specs(specs: &[AgentSpec]) -> Self {
        let mut summary = Self::default();
        for spec in specs {
            match spec.class {
                AgentClass::Population => summary.citizens += 1,
                AgentClass::Cop => summary.cops += 1,
                AgentClass::Propaganda => summary.propagandists += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.citizens + self.cops + self.propagandists
    }
}

/// Draw one spec per cell, column by column.
///
/// Each cell gets a cop with probability `cop_density`, else a citizen with
/// probability `citizen_density`, else a propagandist with probability
/// `propaganda_density` when propaganda is allowed, else stays empty.
/// Citizen traits are uniform on [0, 1]; propagandist influence is the
/// configured value or uniform on [0, 1].
pub fn generate_specs<R: Rng + ?Sized>(params: &ModelParams, rng: &mut R) -> Vec<AgentSpec> {
    let cop_cut = params.cop_density;
    let citizen_cut = cop_cut + params.citizen_density;
    let propaganda_cut = citizen_cut + params.effective_propaganda_density();

    let mut specs = Vec::new();
    for x in 0..params.width {
        for y in 0..params.height {
            let pos = GridPos::new(x, y);
            let draw: f64 = rng.gen();
            if draw < cop_cut {
                specs.push(AgentSpec::cop(pos));
            } else if draw < citizen_cut {
                specs.push(
                    AgentSpec::citizen(pos)
                        .with_hardship(rng.gen())
                        .with_risk_aversion(rng.gen())
                        .with_susceptibility(rng.gen()),
                );
            } else if draw < propaganda_cut {
                let influence = params.propaganda.influence.unwrap_or_else(|| rng.gen());
                specs.push(AgentSpec::propagandist(pos).with_influence(influence));
            }
        }
    }
    specs
}

/// Spawn one agent and place it on the grid.
pub fn spawn_agent(
    world: &mut World,
    params: &ModelParams,
    id: AgentId,
    spec: AgentSpec,
) -> Result<Entity, SimError> {
    let base = (id, ClassTag(spec.class), Position(spec.pos));
    let entity = match spec.class {
        AgentClass::Population => {
            let mut citizen = Citizen::new(
                spec.hardship,
                params.legitimacy,
                spec.risk_aversion,
                spec.susceptibility,
                params.active_threshold,
            );
            citizen.active = spec.active;
            world
                .spawn((base, Vision(params.citizen_vision), JailTerm::default(), citizen))
                .id()
        }
        AgentClass::Cop => world.spawn((base, Vision(params.cop_vision), Cop)).id(),
        AgentClass::Propaganda => {
            let agent = Propagandist::new(
                params.propaganda.strategy,
                spec.influence,
                params.propaganda.exposure_threshold,
            );
            world
                .spawn((base, Vision(params.propaganda_vision), JailTerm::default(), agent))
                .id()
        }
    };

    if let Err(e) = world.resource_mut::<SpatialGrid>().place(entity, spec.pos) {
        world.despawn(entity);
        return Err(e.into());
    }
    Ok(entity)
}
