//! Citizen Components
//!
//! Population agent state and the pure rules behind it: grievance, perceived
//! arrest probability, net risk and the activation trigger.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Grievance of a citizen before any propaganda: hardship scaled by illegitimacy.
pub fn base_grievance(hardship: f64, legitimacy: f64) -> f64 {
    hardship * (1.0 - legitimacy)
}

/// Cops per active agent in view, rounded down.
///
/// `actives` includes the observer itself, so it is never zero in practice;
/// a zero is treated as one.
pub fn cop_to_active_ratio(cops: usize, actives: usize) -> u32 {
    (cops / actives.max(1)) as u32
}

/// Perceived probability of arrest, `1 - exp(-k * ratio)`.
pub fn arrest_probability(arrest_prob_constant: f64, ratio: u32) -> f64 {
    1.0 - (-arrest_prob_constant * ratio as f64).exp()
}

/// Perceived personal cost of rebelling.
pub fn net_risk(risk_aversion: f64, arrest_probability: f64) -> f64 {
    risk_aversion * arrest_probability
}

/// Change of a citizen's activation state during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationChange {
    Activated,
    Quiesced,
}

/// Population agent state
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    /// Perceived hardship, fixed at creation
    pub hardship: f64,
    /// Perceived regime legitimacy, fixed at creation
    pub legitimacy: f64,
    pub grievance: f64,
    pub risk_aversion: f64,
    /// Sensitivity to propaganda
    pub susceptibility: f64,
    /// Activation threshold
    pub threshold: f64,
    pub active: bool,
    /// Last computed value; `None` until the citizen first steps free
    pub arrest_probability: Option<f64>,
    pub net_risk: f64,
    /// Propaganda exposures counted toward the next risk discount
    pub propaganda_exposures: u32,
}

impl Citizen {
    pub fn new(
        hardship: f64,
        legitimacy: f64,
        risk_aversion: f64,
        susceptibility: f64,
        threshold: f64,
    ) -> Self {
        Self {
            hardship,
            legitimacy,
            grievance: base_grievance(hardship, legitimacy),
            risk_aversion,
            susceptibility,
            threshold,
            active: false,
            arrest_probability: None,
            net_risk: 0.0,
            propaganda_exposures: 0,
        }
    }

    /// Whether grievance outweighs net risk by more than the threshold.
    pub fn wants_to_rebel(&self) -> bool {
        self.grievance - self.net_risk > self.threshold
    }

    /// Level-triggered transition: active exactly when the trigger holds.
    pub fn update_activation(&mut self) -> Option<ActivationChange> {
        let trigger = self.wants_to_rebel();
        match (self.active, trigger) {
            (false, true) => {
                self.active = true;
                Some(ActivationChange::Activated)
            }
            (true, false) => {
                self.active = false;
                Some(ActivationChange::Quiesced)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base_grievance() {
        assert!((base_grievance(0.5, 0.2) - 0.4).abs() < 1e-12);
        assert_eq!(base_grievance(0.9, 1.0), 0.0);
    }

    #[test]
    fn test_ratio_is_floored() {
        assert_eq!(cop_to_active_ratio(0, 1), 0);
        assert_eq!(cop_to_active_ratio(3, 2), 1);
        assert_eq!(cop_to_active_ratio(5, 2), 2);
        assert_eq!(cop_to_active_ratio(1, 4), 0);
        assert_eq!(cop_to_active_ratio(2, 0), 2);
    }

    #[test]
    fn test_arrest_probability_values() {
        assert_eq!(arrest_probability(2.3, 0), 0.0);
        let p = arrest_probability(2.3, 1);
        assert!((p - (1.0 - (-2.3f64).exp())).abs() < 1e-12);
        assert!(p > 0.89 && p < 0.91);
    }

    #[test]
    fn test_citizen_new_derives_grievance() {
        let citizen = Citizen::new(0.8, 0.5, 0.3, 0.6, 0.1);
        assert!((citizen.grievance - 0.4).abs() < 1e-12);
        assert!(!citizen.active);
        assert!(citizen.arrest_probability.is_none());
    }

    #[test]
    fn test_activation_is_level_triggered() {
        let mut citizen = Citizen::new(1.0, 0.5, 1.0, 0.0, 0.1);
        citizen.net_risk = 0.0;
        assert_eq!(citizen.update_activation(), Some(ActivationChange::Activated));
        assert_eq!(citizen.update_activation(), None);

        citizen.net_risk = 0.45;
        assert_eq!(citizen.update_activation(), Some(ActivationChange::Quiesced));
        assert!(!citizen.active);
        assert_eq!(citizen.update_activation(), None);
    }

    #[test]
    fn test_grievance_equal_to_threshold_does_not_activate() {
        let mut citizen = Citizen::new(0.2, 0.5, 0.0, 0.0, 0.1);
        assert_eq!(citizen.update_activation(), None);
        assert!(!citizen.active);
    }

    proptest! {
        #[test]
        fn arrest_probability_non_decreasing_in_ratio(k in 0.0f64..10.0, r in 0u32..50) {
            prop_assert!(arrest_probability(k, r + 1) >= arrest_probability(k, r));
        }

        #[test]
        fn arrest_probability_is_a_probability(k in 0.0f64..10.0, r in 0u32..1000) {
            let p = arrest_probability(k, r);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
