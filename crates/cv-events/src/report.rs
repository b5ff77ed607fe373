//! Run Report
//!
//! The envelope written at the end of a run: identity, seed, the parameters
//! used, and the full metric trajectory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StepMetrics;

/// Output of a complete run.
///
/// `params` is kept as an opaque JSON value so this crate does not depend on
/// the engine's configuration types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub seed: u64,
    pub params: serde_json::Value,
    pub steps_run: u64,
    pub metrics: Vec<StepMetrics>,
}

impl RunReport {
    pub fn new(seed: u64, params: serde_json::Value, metrics: Vec<StepMetrics>) -> Self {
        let steps_run = metrics.last().map_or(0, |m| m.step);
        Self {
            run_id: Uuid::new_v4(),
            seed,
            params,
            steps_run,
            metrics,
        }
    }

    /// Metrics of the last recorded step.
    pub fn final_metrics(&self) -> Option<&StepMetrics> {
        self.metrics.last()
    }

    /// Largest number of simultaneously active citizens over the run.
    pub fn peak_active(&self) -> usize {
        self.metrics.iter().map(|m| m.active).max().unwrap_or(0)
    }
}
