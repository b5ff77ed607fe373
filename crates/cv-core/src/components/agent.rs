//! Agent Components
//!
//! Identity, class tag, placement and jail state common to all agent kinds.

use bevy_ecs::prelude::*;
use cv_events::{AgentClass, GridPos};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an agent, assigned at creation and never reused
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{:05}", self.0)
    }
}

/// Which kind of agent this entity is; drives step dispatch
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassTag(pub AgentClass);

/// Current cell; for a jailed agent, the cell it was arrested in
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub GridPos);

/// Neighbourhood radius in cells
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vision(pub u32);

/// Marker component for cops
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Cop;

/// Outcome of serving one step of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentence {
    /// Not in jail
    Free,
    /// Still in jail after this step
    Serving,
    /// The last step was served this step
    Released,
}

/// Remaining jail steps; zero means free
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JailTerm(pub u32);

impl JailTerm {
    pub fn is_jailed(&self) -> bool {
        self.0 > 0
    }

    pub fn remaining(&self) -> u32 {
        self.0
    }

    /// Start a sentence of `steps` steps.
    pub fn sentence(&mut self, steps: u32) {
        self.0 = steps;
    }

    /// Serve one step, reporting whether the agent is still inside.
    pub fn serve_step(&mut self) -> Sentence {
        match self.0 {
            0 => Sentence::Free,
            1 => {
                self.0 = 0;
                Sentence::Released
            }
            _ => {
                self.0 -= 1;
                Sentence::Serving
            }
        }
    }
}
