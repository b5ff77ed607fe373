//! Civil Violence Model
//!
//! Owns the world and drives it: construction from parameters, one randomized
//! activation pass per step, then data collection and the clock.

use bevy_ecs::prelude::*;
use cv_events::{AgentClass, AgentReport, RunReport, SimEvent, StepMetrics};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::clock::SimulationClock;
use crate::components::{AgentId, Citizen, ClassTag, JailTerm, Position, Propagandist};
use crate::config::ModelParams;
use crate::error::SimError;
use crate::events::StepEvents;
use crate::grid::SpatialGrid;
use crate::output::{log_step_summary, record_step_metrics, DataCollector};
use crate::propaganda::PropagandaEngine;
use crate::scheduler::RandomActivation;
use crate::setup::{generate_specs, spawn_agent, AgentSpec, SpawnSummary};
use crate::systems::{component, step_agent};
use crate::SimRng;

pub struct Model {
    world: World,
    engine: PropagandaEngine,
    collectors: Schedule,
    seed: u64,
}

impl Model {
    /// Build a model, placing agents at random from the configured densities.
    pub fn new(params: ModelParams, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let specs = generate_specs(&params, &mut rng);
        Self::build(params, seed, rng, specs)
    }

    /// Build a model with exactly the given agents, ids assigned from 1 in order.
    pub fn from_specs(
        params: ModelParams,
        seed: u64,
        specs: Vec<AgentSpec>,
    ) -> Result<Self, SimError> {
        params.validate()?;
        let rng = SmallRng::seed_from_u64(seed);
        Self::build(params, seed, rng, specs)
    }

    fn build(
        params: ModelParams,
        seed: u64,
        rng: SmallRng,
        specs: Vec<AgentSpec>,
    ) -> Result<Self, SimError> {
        let summary = SpawnSummary::from_specs(&specs);
        let mut world = World::new();
        world.insert_resource(SpatialGrid::new(params.width, params.height, params.torus));
        world.insert_resource(StepEvents::new());
        world.insert_resource(DataCollector::new());
        world.insert_resource(SimulationClock::new(params.max_iters));

        let mut scheduler = RandomActivation::new();
        for (i, spec) in specs.into_iter().enumerate() {
            let id = AgentId(i as u32 + 1);
            let entity = spawn_agent(&mut world, &params, id, spec)?;
            scheduler.add(id, entity);
        }

        tracing::info!(
            "Model ready: {}x{} grid, {} citizens, {} cops, {} propagandists ({} strategy), seed {}",
            params.width,
            params.height,
            summary.citizens,
            summary.cops,
            summary.propagandists,
            params.propaganda.strategy,
            seed
        );

        let engine = PropagandaEngine::new(&params.propaganda);
        world.insert_resource(scheduler);
        world.insert_resource(SimRng(rng));
        world.insert_resource(params);

        let mut collectors = Schedule::default();
        collectors.add_systems((record_step_metrics, log_step_summary).chain());
        collectors.run(&mut world);

        Ok(Self {
            world,
            engine,
            collectors,
            seed,
        })
    }

    /// Advance one step with a freshly shuffled activation order.
    pub fn step(&mut self) -> Result<(), SimError> {
        let order = self
            .world
            .resource_scope(|world, mut rng: Mut<SimRng>| {
                world.resource::<RandomActivation>().shuffled(&mut rng.0)
            });
        self.activate(order)
    }

    /// Advance one step activating agents in exactly the given order.
    pub fn step_with_order(&mut self, ids: &[AgentId]) -> Result<(), SimError> {
        let order = self.world.resource::<RandomActivation>().order_from_ids(ids)?;
        self.activate(order)
    }

    fn activate(&mut self, order: Vec<(AgentId, Entity)>) -> Result<(), SimError> {
        let step = self.world.resource::<SimulationClock>().current_step();
        self.world.resource_mut::<StepEvents>().begin_step(step);

        for (_, entity) in order {
            step_agent(&mut self.world, entity, &self.engine)?;
        }

        self.world.resource_mut::<SimulationClock>().advance();
        self.collectors.run(&mut self.world);
        Ok(())
    }

    /// Step until the clock stops.
    pub fn run(&mut self) -> Result<(), SimError> {
        while self.is_running() {
            self.step()?;
        }
        if let Some(m) = self.latest_metrics() {
            tracing::info!(
                "Run finished after {} steps: {} quiescent, {} active, {} jailed",
                m.step,
                m.quiescent,
                m.active,
                m.jailed
            );
        }
        Ok(())
    }

    /// Step at most `steps` times, stopping early if the clock stops.
    pub fn run_for(&mut self, steps: u64) -> Result<(), SimError> {
        for _ in 0..steps {
            if !self.is_running() {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<SimulationClock>().running
    }

    /// Completed steps.
    pub fn iteration(&self) -> u64 {
        self.world.resource::<SimulationClock>().iteration
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &ModelParams {
        self.world.resource::<ModelParams>()
    }

    pub fn grid(&self) -> &SpatialGrid {
        self.world.resource::<SpatialGrid>()
    }

    pub fn engine(&self) -> &PropagandaEngine {
        &self.engine
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// All agent ids in creation order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.world
            .resource::<RandomActivation>()
            .agents()
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn entity(&self, id: AgentId) -> Option<Entity> {
        self.world.resource::<RandomActivation>().entity_of(id)
    }

    pub fn citizen(&self, id: AgentId) -> Option<&Citizen> {
        self.entity(id).and_then(|e| self.world.get::<Citizen>(e))
    }

    pub fn propagandist(&self, id: AgentId) -> Option<&Propagandist> {
        self.entity(id).and_then(|e| self.world.get::<Propagandist>(e))
    }

    pub fn position(&self, id: AgentId) -> Option<cv_events::GridPos> {
        self.entity(id)
            .and_then(|e| self.world.get::<Position>(e))
            .map(|p| p.0)
    }

    /// Remaining sentence; `None` for unknown agents and cops.
    pub fn jail_time(&self, id: AgentId) -> Option<u32> {
        self.entity(id)
            .and_then(|e| self.world.get::<JailTerm>(e))
            .map(|j| j.remaining())
    }

    pub fn metrics_history(&self) -> &[StepMetrics] {
        self.world.resource::<DataCollector>().history()
    }

    pub fn latest_metrics(&self) -> Option<&StepMetrics> {
        self.world.resource::<DataCollector>().latest()
    }

    /// Events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<StepEvents>().drain()
    }

    /// Readable per-agent fields, in creation order.
    pub fn agent_reports(&self) -> Result<Vec<AgentReport>, SimError> {
        let scheduler = self.world.resource::<RandomActivation>();
        let mut reports = Vec::with_capacity(scheduler.len());

        for &(id, entity) in scheduler.agents() {
            let class = component::<ClassTag>(&self.world, entity)?.0;
            let position = component::<Position>(&self.world, entity)?.0;
            let jail_time = self.world.get::<JailTerm>(entity).map_or(0, |j| j.remaining());
            let (active, arrest_probability, grievance) = match class {
                AgentClass::Population => {
                    let citizen = component::<Citizen>(&self.world, entity)?;
                    (citizen.active, citizen.arrest_probability, Some(citizen.grievance))
                }
                AgentClass::Propaganda => {
                    let agent = component::<Propagandist>(&self.world, entity)?;
                    (jail_time == 0 && agent.strategy.always_active(), None, None)
                }
                AgentClass::Cop => (false, None, None),
            };
            reports.push(AgentReport {
                id: id.0,
                class,
                position,
                jail_time,
                active,
                arrest_probability,
                grievance,
            });
        }
        Ok(reports)
    }

    /// Report of the run so far.
    pub fn report(&self) -> Result<RunReport, SimError> {
        let params = serde_json::to_value(self.params())?;
        Ok(RunReport::new(
            self.seed,
            params,
            self.metrics_history().to_vec(),
        ))
    }
}
