//! Simulation Clock
//!
//! Iteration counter and the run/stop flag.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    /// Completed steps
    pub iteration: u64,
    pub max_iters: u64,
    pub running: bool,
}

impl SimulationClock {
    pub fn new(max_iters: u64) -> Self {
        Self {
            iteration: 0,
            max_iters,
            running: true,
        }
    }

    /// Label of the step in progress (1-based).
    pub fn current_step(&self) -> u64 {
        self.iteration + 1
    }

    /// Count a completed step; stops once the iteration count exceeds `max_iters`.
    pub fn advance(&mut self) {
        self.iteration += 1;
        if self.iteration > self.max_iters {
            self.running = false;
        }
    }
}
