//! Arrest and Jailing
//!
//! Sentencing by cops and the countdown shared by citizens and propagandists.
//! A jailed agent is taken off the grid; its `Position` keeps the cell it was
//! arrested in, and it re-enters the grid when released.

use bevy_ecs::prelude::*;
use cv_events::{AgentClass, EventKind, GridPos};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{AgentId, Citizen, ClassTag, JailTerm, Position, Propagandist, Sentence, Vision};
use crate::config::ModelParams;
use crate::error::{GridError, SimError};
use crate::events::StepEvents;
use crate::grid::SpatialGrid;
use crate::SimRng;

use super::{component, component_mut, Neighbor};

/// Sentence `target` to a uniformly random term in `[1, max_jail_term]` and
/// take it off the grid. Returns the vacated cell.
pub fn arrest(world: &mut World, cop: AgentId, target: &Neighbor) -> Result<GridPos, SimError> {
    let max_term = world.resource::<ModelParams>().max_jail_term.max(1);
    let term = world.resource_mut::<SimRng>().0.gen_range(1..=max_term);
    let class = component::<ClassTag>(world, target.entity)?.0;

    component_mut::<JailTerm>(world, target.entity)?.sentence(term);
    let remaining_influence = match class {
        AgentClass::Propaganda => {
            let mut agent = component_mut::<Propagandist>(world, target.entity)?;
            agent.on_arrest(term);
            Some(agent.total_influence)
        }
        _ => None,
    };

    world.resource_mut::<SpatialGrid>().remove(target.pos)?;

    tracing::debug!(
        "{} arrested {} ({}) at {} for {} steps",
        cop,
        target.id,
        class,
        target.pos,
        term
    );
    world.resource_mut::<StepEvents>().push(
        target.id,
        EventKind::Arrest {
            cop: cop.0,
            class,
            jail_term: term,
            remaining_influence,
        },
    );

    Ok(target.pos)
}

/// Serve one step of any sentence, releasing the agent when it ends.
pub fn serve_sentence(world: &mut World, entity: Entity) -> Result<Sentence, SimError> {
    let sentence = component_mut::<JailTerm>(world, entity)?.serve_step();
    if sentence == Sentence::Released {
        release(world, entity)?;
    }
    Ok(sentence)
}

fn release(world: &mut World, entity: Entity) -> Result<(), SimError> {
    let concealed = match component::<ClassTag>(world, entity)?.0 {
        AgentClass::Population => {
            component_mut::<Citizen>(world, entity)?.active = false;
            None
        }
        AgentClass::Propaganda => {
            let mut agent = component_mut::<Propagandist>(world, entity)?;
            agent
                .on_release()
                .map(|_| EventKind::Concealed {
                    total_influence: agent.total_influence,
                })
        }
        AgentClass::Cop => None,
    };

    let last = component::<Position>(world, entity)?.0;
    let vision = component::<Vision>(world, entity)?.0;
    let cell = readmission_cell(world, last, vision)?;
    world.resource_mut::<SpatialGrid>().place(entity, cell)?;
    component_mut::<Position>(world, entity)?.0 = cell;

    let id = *component::<AgentId>(world, entity)?;
    tracing::debug!("{} released at {}", id, cell);
    let mut events = world.resource_mut::<StepEvents>();
    events.push(id, EventKind::Release);
    if let Some(kind) = concealed {
        events.push(id, kind);
    }
    Ok(())
}

/// The arrest cell if still free, else a random free cell in view, else any free cell.
fn readmission_cell(world: &mut World, last: GridPos, vision: u32) -> Result<GridPos, SimError> {
    let candidates = {
        let grid = world.resource::<SpatialGrid>();
        if grid.is_empty(last) {
            return Ok(last);
        }
        let nearby: Vec<GridPos> = grid
            .neighborhood(last, vision)
            .into_iter()
            .filter(|&pos| grid.is_empty(pos))
            .collect();
        if nearby.is_empty() {
            grid.empty_cells()
        } else {
            nearby
        }
    };
    let mut rng = world.resource_mut::<SimRng>();
    candidates
        .choose(&mut rng.0)
        .copied()
        .ok_or(SimError::Grid(GridError::Full))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{spawn_agent, AgentSpec};
    use crate::systems::perception::survey;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn world(params: ModelParams, specs: Vec<AgentSpec>) -> (World, Vec<Entity>) {
        let mut world = World::new();
        world.insert_resource(SpatialGrid::new(params.width, params.height, params.torus));
        world.insert_resource(SimRng(SmallRng::seed_from_u64(11)));
        world.insert_resource(StepEvents::new());
        let mut entities = Vec::new();
        for (i, spec) in specs.into_iter().enumerate() {
            entities.push(spawn_agent(&mut world, &params, AgentId(i as u32 + 1), spec).unwrap());
        }
        world.insert_resource(params);
        (world, entities)
    }

    fn small_params() -> ModelParams {
        ModelParams {
            width: 5,
            height: 5,
            max_jail_term: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_arrest_sentences_and_vacates_cell() {
        let (mut world, entities) = world(
            small_params(),
            vec![
                AgentSpec::cop(GridPos::new(2, 2)),
                AgentSpec::citizen(GridPos::new(2, 3)).active(),
            ],
        );
        let seen = survey(&world, GridPos::new(2, 2), 1).unwrap();
        let target = seen.active_citizens()[0];
        let cell = arrest(&mut world, AgentId(1), target).unwrap();

        assert_eq!(cell, GridPos::new(2, 3));
        assert!(world.resource::<SpatialGrid>().is_empty(cell));
        let term = world.get::<JailTerm>(entities[1]).unwrap().remaining();
        assert!((1..=4).contains(&term));
        // still active while serving
        assert!(world.get::<Citizen>(entities[1]).unwrap().active);

        let events = world.resource_mut::<StepEvents>().drain();
        assert_eq!(events.len(), 1);
        assert!(events[0].involves_agent(1));
        assert!(matches!(events[0].kind, EventKind::Arrest { jail_term, .. } if jail_term == term));
    }

    #[test]
    fn test_release_clears_active_and_returns_to_cell() {
        let (mut world, entities) = world(
            small_params(),
            vec![AgentSpec::citizen(GridPos::new(1, 1)).active()],
        );
        let citizen = entities[0];
        world.resource_mut::<SpatialGrid>().remove(GridPos::new(1, 1)).unwrap();
        world.get_mut::<JailTerm>(citizen).unwrap().sentence(2);

        assert_eq!(serve_sentence(&mut world, citizen).unwrap(), Sentence::Serving);
        assert!(world.get::<Citizen>(citizen).unwrap().active);
        assert_eq!(serve_sentence(&mut world, citizen).unwrap(), Sentence::Released);
        assert!(!world.get::<Citizen>(citizen).unwrap().active);
        assert_eq!(
            world.resource::<SpatialGrid>().occupant(GridPos::new(1, 1)),
            Some(citizen)
        );
    }

    #[test]
    fn test_release_into_nearby_cell_when_taken() {
        let (mut world, entities) = world(
            small_params(),
            vec![
                AgentSpec::propagandist(GridPos::new(1, 1)),
                AgentSpec::cop(GridPos::new(4, 4)),
            ],
        );
        let (agent, cop) = (entities[0], entities[1]);
        {
            let mut grid = world.resource_mut::<SpatialGrid>();
            grid.remove(GridPos::new(1, 1)).unwrap();
            grid.move_agent(GridPos::new(4, 4), GridPos::new(1, 1)).unwrap();
        }
        world.get_mut::<Position>(cop).unwrap().0 = GridPos::new(1, 1);
        world.get_mut::<JailTerm>(agent).unwrap().sentence(1);
        world.get_mut::<Propagandist>(agent).unwrap().visible_to_cops = true;

        assert_eq!(serve_sentence(&mut world, agent).unwrap(), Sentence::Released);
        let pos = world.get::<Position>(agent).unwrap().0;
        assert_ne!(pos, GridPos::new(1, 1));
        assert_eq!(world.resource::<SpatialGrid>().occupant(pos), Some(agent));
        assert!(!world.get::<Propagandist>(agent).unwrap().visible_to_cops);
        assert_eq!(world.resource::<SpatialGrid>().occupied_count(), 2);

        let labels: Vec<&str> = world
            .resource::<StepEvents>()
            .pending()
            .iter()
            .map(|e| e.kind.label())
            .collect();
        assert_eq!(labels, vec!["release", "concealed"]);
    }

    #[test]
    fn test_propagandist_arrest_divides_influence() {
        let mut params = small_params();
        params.max_jail_term = 1;
        params.propaganda.strategy = crate::propaganda::PropagandaStrategy::Bandwagon;
        let (mut world, entities) = world(
            params,
            vec![
                AgentSpec::cop(GridPos::new(0, 0)),
                AgentSpec::propagandist(GridPos::new(0, 1)),
            ],
        );
        world.get_mut::<Propagandist>(entities[1]).unwrap().total_influence = 3.0;
        let seen = survey(&world, GridPos::new(0, 0), 1).unwrap();
        arrest(&mut world, AgentId(1), &seen.neighbors[0]).unwrap();
        let events = world.resource_mut::<StepEvents>().drain();
        assert!(matches!(
            events[0].kind,
            EventKind::Arrest { jail_term: 1, remaining_influence: Some(r), .. } if r == 3.0
        ));
    }
}
