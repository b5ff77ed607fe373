//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! ```ignore
//! // [dev-dependencies]
//! // cv-events = { path = "../cv-events", features = ["test-fixtures"] }
//!
//! use cv_events::fixtures;
//!
//! let events = fixtures::sample_events();
//! ```

use crate::{AgentClass, EventKind, SimEvent, StepMetrics};

/// Returns a short, plausible trajectory of `steps + 1` metric records.
pub fn sample_metrics(steps: u64) -> Vec<StepMetrics> {
    (0..=steps)
        .map(|step| {
            let active = (step as usize * 3) % 11;
            let jailed = step as usize / 2;
            StepMetrics {
                step,
                quiescent: 100 - active - jailed,
                active,
                jailed,
                propaganda_effective: 20,
                propaganda_exposed: 0,
                propaganda_jailed: 0,
                total_grievance: 12.5,
                total_net_risk: 4.25,
                ripeness_index: 25.0,
            }
        })
        .collect()
}

/// Returns a handful of events covering every kind.
pub fn sample_events() -> Vec<SimEvent> {
    vec![
        SimEvent::new(
            "evt_00000001",
            1,
            12,
            EventKind::Activated {
                grievance: 0.42,
                net_risk: 0.1,
            },
        ),
        SimEvent::new(
            "evt_00000002",
            1,
            12,
            EventKind::Arrest {
                cop: 3,
                class: AgentClass::Population,
                jail_term: 7,
                remaining_influence: None,
            },
        ),
        SimEvent::new(
            "evt_00000003",
            2,
            40,
            EventKind::Exposed {
                total_influence: 5.5,
            },
        ),
        SimEvent::new(
            "evt_00000004",
            2,
            40,
            EventKind::Arrest {
                cop: 3,
                class: AgentClass::Propaganda,
                jail_term: 2,
                remaining_influence: Some(2.75),
            },
        ),
        SimEvent::new(
            "evt_00000005",
            3,
            40,
            EventKind::Concealed {
                total_influence: 2.75,
            },
        ),
        SimEvent::new(
            "evt_00000006",
            4,
            21,
            EventKind::Quiesced {
                grievance: 0.05,
                net_risk: 0.3,
            },
        ),
        SimEvent::new("evt_00000007", 8, 12, EventKind::Release),
    ]
}
