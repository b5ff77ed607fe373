//! Propagandist Components
//!
//! State of a propaganda agent: its strategy, base influence, and the
//! accumulated bandwagon influence that can expose it to cops.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::propaganda::{bandwagon_contribution, PropagandaStrategy};

/// Change of a propagandist's visibility during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Exposed,
    Concealed,
}

/// Propaganda agent state
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propagandist {
    pub strategy: PropagandaStrategy,
    /// Base influence on each citizen in view
    pub influence: f64,
    /// Accumulated bandwagon influence
    pub total_influence: f64,
    /// `total_influence` above which cops can see this agent
    pub exposure_threshold: f64,
    pub visible_to_cops: bool,
}

impl Propagandist {
    pub fn new(strategy: PropagandaStrategy, influence: f64, exposure_threshold: f64) -> Self {
        Self {
            strategy,
            influence,
            total_influence: 0.0,
            exposure_threshold,
            visible_to_cops: false,
        }
    }

    /// Only bandwagon propagandists accumulate influence over their targets.
    pub fn accumulates_influence(&self) -> bool {
        self.strategy == PropagandaStrategy::Bandwagon
    }

    /// Add this step's contribution from the quiescent citizens in view.
    pub fn accumulate(&mut self, target_susceptibilities: &[f64]) {
        self.total_influence += bandwagon_contribution(self.influence, target_susceptibilities);
    }

    /// Re-evaluate exposure against the threshold.
    pub fn refresh_visibility(&mut self) -> Option<VisibilityChange> {
        let visible = self.total_influence > self.exposure_threshold;
        if visible == self.visible_to_cops {
            return None;
        }
        self.visible_to_cops = visible;
        Some(if visible {
            VisibilityChange::Exposed
        } else {
            VisibilityChange::Concealed
        })
    }

    /// Decay accumulated influence by the length of a new sentence.
    pub fn on_arrest(&mut self, jail_term: u32) {
        self.total_influence /= jail_term.max(1) as f64;
    }

    /// Leave jail hidden from cops.
    pub fn on_release(&mut self) -> Option<VisibilityChange> {
        if !self.visible_to_cops {
            return None;
        }
        self.visible_to_cops = false;
        Some(VisibilityChange::Concealed)
    }
}
