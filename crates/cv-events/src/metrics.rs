//! Metric Records
//!
//! Model-level statistics collected once per step, and the per-agent readout
//! exposed to data collectors.

use serde::{Deserialize, Serialize};

use crate::{AgentClass, GridPos};

/// Aggregate statistics for one step.
///
/// Sums and means over citizens exclude jailed agents unless the field says
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    pub step: u64,
    /// Citizens neither active nor jailed
    pub quiescent: usize,
    /// Active citizens not in jail
    pub active: usize,
    /// Citizens serving a sentence
    pub jailed: usize,
    /// Propagandists currently out of jail
    pub propaganda_effective: usize,
    /// Propagandists currently visible to cops
    #[serde(default)]
    pub propaganda_exposed: usize,
    /// Propagandists serving a sentence
    #[serde(default)]
    pub propaganda_jailed: usize,
    /// Grievance summed over quiescent citizens
    pub total_grievance: f64,
    /// Net risk summed over quiescent citizens
    pub total_net_risk: f64,
    /// mean grievance * quiescent count / mean risk aversion
    pub ripeness_index: f64,
}

impl StepMetrics {
    /// Total citizens regardless of state.
    pub fn population(&self) -> usize {
        self.quiescent + self.active + self.jailed
    }

    /// Fraction of the population currently active.
    pub fn active_fraction(&self) -> f64 {
        let total = self.population();
        if total == 0 {
            0.0
        } else {
            self.active as f64 / total as f64
        }
    }
}

/// Readable per-agent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub id: u32,
    pub class: AgentClass,
    pub position: GridPos,
    /// Zero for cops and free agents
    pub jail_time: u32,
    /// Rebelling citizens, and free transfer or demonizing propagandists;
    /// always false for cops
    pub active: bool,
    /// Last computed value; `None` until a citizen has stepped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrest_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grievance: Option<f64>,
}

impl AgentReport {
    pub fn is_jailed(&self) -> bool {
        self.jail_time > 0
    }
}
