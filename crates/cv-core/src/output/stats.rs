//! Statistics Output
//!
//! Aggregate statistics collected after every step.

use bevy_ecs::prelude::*;
use cv_events::StepMetrics;

use crate::clock::SimulationClock;
use crate::components::{Citizen, JailTerm, Propagandist};

/// Resource accumulating one `StepMetrics` per step, starting with the initial state
#[derive(Resource, Debug, Clone, Default)]
pub struct DataCollector {
    history: Vec<StepMetrics>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, metrics: StepMetrics) {
        self.history.push(metrics);
    }

    pub fn history(&self) -> &[StepMetrics] {
        &self.history
    }

    pub fn latest(&self) -> Option<&StepMetrics> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Aggregate citizen and propagandist state into one metrics record.
pub fn compute_metrics<'a>(
    step: u64,
    citizens: impl IntoIterator<Item = (&'a Citizen, &'a JailTerm)>,
    propagandists: impl IntoIterator<Item = (&'a Propagandist, &'a JailTerm)>,
) -> StepMetrics {
    let mut metrics = StepMetrics {
        step,
        ..Default::default()
    };
    let mut free = 0usize;
    let mut grievance_sum = 0.0;
    let mut risk_aversion_sum = 0.0;

    for (citizen, jail) in citizens {
        if jail.is_jailed() {
            metrics.jailed += 1;
            continue;
        }
        free += 1;
        grievance_sum += citizen.grievance;
        risk_aversion_sum += citizen.risk_aversion;
        if citizen.active {
            metrics.active += 1;
        } else {
            metrics.quiescent += 1;
            metrics.total_grievance += citizen.grievance;
            metrics.total_net_risk += citizen.net_risk;
        }
    }

    for (agent, jail) in propagandists {
        if jail.is_jailed() {
            metrics.propaganda_jailed += 1;
        } else {
            metrics.propaganda_effective += 1;
            if agent.visible_to_cops {
                metrics.propaganda_exposed += 1;
            }
        }
    }

    if free > 0 && risk_aversion_sum > 0.0 {
        let mean_grievance = grievance_sum / free as f64;
        let mean_risk_aversion = risk_aversion_sum / free as f64;
        metrics.ripeness_index = mean_grievance * metrics.quiescent as f64 / mean_risk_aversion;
    }
    metrics
}

/// System recording the current state, labelled with the completed iteration count.
pub fn record_step_metrics(
    clock: Res<SimulationClock>,
    mut collector: ResMut<DataCollector>,
    citizens: Query<(&Citizen, &JailTerm)>,
    propagandists: Query<(&Propagandist, &JailTerm)>,
) {
    let metrics = compute_metrics(clock.iteration, citizens.iter(), propagandists.iter());
    collector.record(metrics);
}

/// System emitting the latest metrics at debug level.
pub fn log_step_summary(collector: Res<DataCollector>) {
    if let Some(m) = collector.latest() {
        tracing::debug!(
            step = m.step,
            quiescent = m.quiescent,
            active = m.active,
            jailed = m.jailed,
            propaganda = m.propaganda_effective,
            ripeness = m.ripeness_index,
            "step complete"
        );
    }
}
