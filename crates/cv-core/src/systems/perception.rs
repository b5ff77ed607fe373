//! Perception System
//!
//! Snapshot of what an agent sees: the occupants of its Von Neumann
//! neighbourhood and the empty cells it could move into. Jailed agents are off
//! the grid, so every neighbour found here is free.

use bevy_ecs::prelude::*;
use cv_events::{AgentClass, GridPos};

use crate::components::{AgentId, Citizen, ClassTag, Propagandist};
use crate::error::SimError;
use crate::grid::SpatialGrid;
use crate::propaganda::{PropagandaStrategy, VisiblePropagandist};

use super::component;

/// What kind of agent a neighbour is, with the state other agents react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeighborKind {
    Citizen {
        active: bool,
        susceptibility: f64,
    },
    Cop,
    Propagandist {
        strategy: PropagandaStrategy,
        influence: f64,
        visible_to_cops: bool,
    },
}

/// One agent seen in a neighbourhood
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub entity: Entity,
    pub id: AgentId,
    pub pos: GridPos,
    pub kind: NeighborKind,
}

/// Contents of one neighbourhood at the moment it was surveyed
#[derive(Debug, Clone, Default)]
pub struct Neighborhood {
    pub neighbors: Vec<Neighbor>,
    pub empty: Vec<GridPos>,
}

impl Neighborhood {
    pub fn cop_count(&self) -> usize {
        self.neighbors
            .iter()
            .filter(|n| matches!(n.kind, NeighborKind::Cop))
            .count()
    }

    /// Active citizens plus transfer and demonizing propagandists. Bandwagon
    /// and nationalism propagandists are not counted.
    pub fn active_count(&self) -> usize {
        self.neighbors
            .iter()
            .filter(|n| match n.kind {
                NeighborKind::Citizen { active, .. } => active,
                NeighborKind::Propagandist { strategy, .. } => strategy.always_active(),
                NeighborKind::Cop => false,
            })
            .count()
    }

    pub fn active_citizens(&self) -> Vec<&Neighbor> {
        self.neighbors
            .iter()
            .filter(|n| matches!(n.kind, NeighborKind::Citizen { active: true, .. }))
            .collect()
    }

    /// Propagandists cops can currently see.
    pub fn exposed_propagandists(&self) -> Vec<&Neighbor> {
        self.neighbors
            .iter()
            .filter(|n| {
                matches!(
                    n.kind,
                    NeighborKind::Propagandist {
                        visible_to_cops: true,
                        ..
                    }
                )
            })
            .collect()
    }

    /// Susceptibilities of the quiescent citizens in view.
    pub fn quiescent_susceptibilities(&self) -> Vec<f64> {
        self.neighbors
            .iter()
            .filter_map(|n| match n.kind {
                NeighborKind::Citizen {
                    active: false,
                    susceptibility,
                } => Some(susceptibility),
                _ => None,
            })
            .collect()
    }

    pub fn propagandists(&self) -> Vec<VisiblePropagandist> {
        self.neighbors
            .iter()
            .filter_map(|n| match n.kind {
                NeighborKind::Propagandist {
                    strategy,
                    influence,
                    ..
                } => Some(VisiblePropagandist {
                    pos: n.pos,
                    strategy,
                    influence,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Survey the neighbourhood of `radius` around `center`.
pub fn survey(world: &World, center: GridPos, radius: u32) -> Result<Neighborhood, SimError> {
    let grid = world.resource::<SpatialGrid>();
    let cells = grid.neighborhood(center, radius);
    let mut neighborhood = Neighborhood::default();

    for &pos in &cells {
        let Some(entity) = grid.occupant(pos) else {
            neighborhood.empty.push(pos);
            continue;
        };
        let id = *component::<AgentId>(world, entity)?;
        let kind = match component::<ClassTag>(world, entity)?.0 {
            AgentClass::Population => {
                let citizen = component::<Citizen>(world, entity)?;
                NeighborKind::Citizen {
                    active: citizen.active,
                    susceptibility: citizen.susceptibility,
                }
            }
            AgentClass::Cop => NeighborKind::Cop,
            AgentClass::Propaganda => {
                let agent = component::<Propagandist>(world, entity)?;
                NeighborKind::Propagandist {
                    strategy: agent.strategy,
                    influence: agent.influence,
                    visible_to_cops: agent.visible_to_cops,
                }
            }
        };
        neighborhood.neighbors.push(Neighbor {
            entity,
            id,
            pos,
            kind,
        });
    }

    Ok(neighborhood)
}
