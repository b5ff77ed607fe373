//! Propaganda Engine
//!
//! The influence models through which propagandists act on citizens. Each
//! strategy is a separate `InfluenceModel`; a configuration selects exactly one.
//!
//! Transfer, bandwagon and demonizing raise grievance. How the raw effect is
//! folded into grievance is chosen by [`GrievanceUpdate`]. Nationalism leaves
//! grievance alone and instead makes a citizen underestimate net risk once it
//! has seen enough propaganda.

use cv_events::GridPos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::PropagandaParams;

/// Floor added to squared distances so a zero distance stays finite
pub const MIN_DISTANCE_SQ: f64 = 1e-4;

/// Propaganda strategy carried by propagandists and selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagandaStrategy {
    /// Effect falls off with inverse squared distance to each propagandist
    #[default]
    Transfer,
    /// Effect sums the influence of every propagandist in view
    Bandwagon,
    /// Effect fires when a cop is in view
    Demonizing,
    /// Repeated exposure discounts perceived risk
    Nationalism,
}

impl PropagandaStrategy {
    pub fn all() -> &'static [PropagandaStrategy] {
        &[
            PropagandaStrategy::Transfer,
            PropagandaStrategy::Bandwagon,
            PropagandaStrategy::Demonizing,
            PropagandaStrategy::Nationalism,
        ]
    }

    /// Transfer and demonizing propagandists never go quiet, so citizens count
    /// them among the actives in view.
    pub fn always_active(&self) -> bool {
        matches!(
            self,
            PropagandaStrategy::Transfer | PropagandaStrategy::Demonizing
        )
    }
}

impl fmt::Display for PropagandaStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagandaStrategy::Transfer => write!(f, "transfer"),
            PropagandaStrategy::Bandwagon => write!(f, "bandwagon"),
            PropagandaStrategy::Demonizing => write!(f, "demonizing"),
            PropagandaStrategy::Nationalism => write!(f, "nationalism"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown propaganda strategy '{0}' (expected transfer, bandwagon, demonizing or nationalism)")]
pub struct ParseStrategyError(pub String);

impl FromStr for PropagandaStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transfer" => Ok(PropagandaStrategy::Transfer),
            "bandwagon" => Ok(PropagandaStrategy::Bandwagon),
            "demonizing" => Ok(PropagandaStrategy::Demonizing),
            "nationalism" => Ok(PropagandaStrategy::Nationalism),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// How a grievance effect is folded into a citizen's grievance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceUpdate {
    /// `grievance += factor * effect`; transfer caps the increment at 1
    #[default]
    Additive,
    /// `grievance = (1 - factor) * grievance + factor * effect`
    Blend,
}

/// A free propagandist seen by a citizen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisiblePropagandist {
    pub pos: GridPos,
    pub strategy: PropagandaStrategy,
    pub influence: f64,
}

/// What a citizen sees this step that propaganda can act on
#[derive(Debug, Clone, Copy)]
pub struct Exposure<'a> {
    pub observer: GridPos,
    pub susceptibility: f64,
    pub cops_in_vision: usize,
    pub propagandists: &'a [VisiblePropagandist],
}

impl<'a> Exposure<'a> {
    /// Propagandists in view that use `strategy`.
    pub fn using(
        &self,
        strategy: PropagandaStrategy,
    ) -> impl Iterator<Item = &'a VisiblePropagandist> + 'a {
        let propagandists: &'a [VisiblePropagandist] = self.propagandists;
        propagandists.iter().filter(move |p| p.strategy == strategy)
    }
}

/// Result of applying an influence model to one citizen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Influence {
    /// No propaganda of the configured kind reached the citizen
    Nothing,
    /// Raw grievance effect, before the propaganda factor
    Grievance { effect: f64 },
    /// Net risk is divided by `divisor` this step
    RiskDiscount { divisor: f64 },
}

impl Influence {
    pub fn risk_divisor(&self) -> f64 {
        match self {
            Influence::RiskDiscount { divisor } => *divisor,
            _ => 1.0,
        }
    }
}

/// Transfer effect: `susceptibility * (sum of 1 / d^2)^2`.
///
/// Distances are taken between raw grid coordinates.
pub fn transfer_effect(
    observer: GridPos,
    susceptibility: f64,
    sources: impl IntoIterator<Item = GridPos>,
) -> f64 {
    let proximity: f64 = sources
        .into_iter()
        .map(|pos| {
            let dx = observer.x as f64 - pos.x as f64;
            let dy = observer.y as f64 - pos.y as f64;
            1.0 / (MIN_DISTANCE_SQ + dx * dx + dy * dy)
        })
        .sum();
    susceptibility * proximity * proximity
}

/// Bandwagon effect: `susceptibility * sum of influences`.
pub fn bandwagon_effect(susceptibility: f64, influences: impl IntoIterator<Item = f64>) -> f64 {
    susceptibility * influences.into_iter().sum::<f64>()
}

/// Demonizing effect: full susceptibility when any cop is in view.
pub fn demonizing_effect(susceptibility: f64, cops_in_vision: usize) -> f64 {
    if cops_in_vision > 0 {
        susceptibility
    } else {
        0.0
    }
}

/// Influence a bandwagon propagandist gains from the quiescent citizens in its view.
///
/// Each target contributes `influence * susceptibility / targets`.
pub fn bandwagon_contribution(influence: f64, target_susceptibilities: &[f64]) -> f64 {
    if target_susceptibilities.is_empty() {
        return 0.0;
    }
    let n = target_susceptibilities.len() as f64;
    target_susceptibilities
        .iter()
        .map(|s| influence * s / n)
        .sum()
}

/// One propaganda strategy's effect on a citizen
pub trait InfluenceModel: fmt::Debug {
    fn strategy(&self) -> PropagandaStrategy;

    /// Compute the influence on one citizen. `exposures_seen` is the citizen's
    /// running exposure count, which only counting models touch.
    fn influence(&self, exposure: &Exposure<'_>, exposures_seen: &mut u32) -> Influence;

    /// Grievance increment under the additive formulation.
    fn additive_increment(&self, effect: f64, factor: f64) -> f64 {
        factor * effect
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Transfer;

impl InfluenceModel for Transfer {
    fn strategy(&self) -> PropagandaStrategy {
        PropagandaStrategy::Transfer
    }

    fn influence(&self, exposure: &Exposure<'_>, _exposures_seen: &mut u32) -> Influence {
        let sources: Vec<GridPos> = exposure.using(self.strategy()).map(|p| p.pos).collect();
        if sources.is_empty() {
            return Influence::Nothing;
        }
        Influence::Grievance {
            effect: transfer_effect(exposure.observer, exposure.susceptibility, sources),
        }
    }

    fn additive_increment(&self, effect: f64, factor: f64) -> f64 {
        (effect * factor).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bandwagon;

impl InfluenceModel for Bandwagon {
    fn strategy(&self) -> PropagandaStrategy {
        PropagandaStrategy::Bandwagon
    }

    fn influence(&self, exposure: &Exposure<'_>, _exposures_seen: &mut u32) -> Influence {
        let influences: Vec<f64> = exposure.using(self.strategy()).map(|p| p.influence).collect();
        if influences.is_empty() {
            return Influence::Nothing;
        }
        Influence::Grievance {
            effect: bandwagon_effect(exposure.susceptibility, influences),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Demonizing;

impl InfluenceModel for Demonizing {
    fn strategy(&self) -> PropagandaStrategy {
        PropagandaStrategy::Demonizing
    }

    fn influence(&self, exposure: &Exposure<'_>, _exposures_seen: &mut u32) -> Influence {
        if exposure.using(self.strategy()).next().is_none() {
            return Influence::Nothing;
        }
        Influence::Grievance {
            effect: demonizing_effect(exposure.susceptibility, exposure.cops_in_vision),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Nationalism {
    pub exposure_threshold: u32,
    pub risk_divisor: f64,
}

impl InfluenceModel for Nationalism {
    fn strategy(&self) -> PropagandaStrategy {
        PropagandaStrategy::Nationalism
    }

    fn influence(&self, exposure: &Exposure<'_>, exposures_seen: &mut u32) -> Influence {
        let seen = exposure.using(self.strategy()).count() as u32;
        if seen == 0 {
            return Influence::Nothing;
        }
        *exposures_seen += seen;
        if *exposures_seen >= self.exposure_threshold {
            *exposures_seen = 0;
            return Influence::RiskDiscount {
                divisor: self.risk_divisor,
            };
        }
        Influence::Nothing
    }
}

/// The configured influence model plus the grievance formulation
#[derive(Debug)]
pub struct PropagandaEngine {
    model: Box<dyn InfluenceModel>,
    update: GrievanceUpdate,
    factor: f64,
}

impl PropagandaEngine {
    pub fn new(params: &PropagandaParams) -> Self {
        let model: Box<dyn InfluenceModel> = match params.strategy {
            PropagandaStrategy::Transfer => Box::new(Transfer),
            PropagandaStrategy::Bandwagon => Box::new(Bandwagon),
            PropagandaStrategy::Demonizing => Box::new(Demonizing),
            PropagandaStrategy::Nationalism => Box::new(Nationalism {
                exposure_threshold: params.propaganda_exposure_threshold,
                risk_divisor: params.risk_divisor,
            }),
        };
        Self {
            model,
            update: params.grievance_update,
            factor: params.propaganda_factor,
        }
    }

    pub fn strategy(&self) -> PropagandaStrategy {
        self.model.strategy()
    }

    pub fn grievance_update(&self) -> GrievanceUpdate {
        self.update
    }

    pub fn influence(&self, exposure: &Exposure<'_>, exposures_seen: &mut u32) -> Influence {
        self.model.influence(exposure, exposures_seen)
    }

    /// Fold a grievance effect into the current grievance.
    pub fn updated_grievance(&self, grievance: f64, effect: f64) -> f64 {
        match self.update {
            GrievanceUpdate::Additive => {
                grievance + self.model.additive_increment(effect, self.factor)
            }
            GrievanceUpdate::Blend => (1.0 - self.factor) * grievance + self.factor * effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(x: u32, y: u32, strategy: PropagandaStrategy, influence: f64) -> VisiblePropagandist {
        VisiblePropagandist {
            pos: GridPos::new(x, y),
            strategy,
            influence,
        }
    }

    fn engine(strategy: PropagandaStrategy, update: GrievanceUpdate, factor: f64) -> PropagandaEngine {
        PropagandaEngine::new(&PropagandaParams {
            strategy,
            grievance_update: update,
            propaganda_factor: factor,
            ..Default::default()
        })
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Bandwagon".parse::<PropagandaStrategy>(), Ok(PropagandaStrategy::Bandwagon));
        assert_eq!("nationalism".parse::<PropagandaStrategy>(), Ok(PropagandaStrategy::Nationalism));
        assert!("glittering".parse::<PropagandaStrategy>().is_err());
        for strategy in PropagandaStrategy::all() {
            assert_eq!(strategy.to_string().parse::<PropagandaStrategy>().as_ref(), Ok(strategy));
        }
    }

    #[test]
    fn test_only_overt_strategies_are_always_active() {
        assert!(PropagandaStrategy::Transfer.always_active());
        assert!(PropagandaStrategy::Demonizing.always_active());
        assert!(!PropagandaStrategy::Bandwagon.always_active());
        assert!(!PropagandaStrategy::Nationalism.always_active());
    }

    #[test]
    fn test_transfer_effect_inverse_square() {
        let observer = GridPos::new(5, 5);
        let effect = transfer_effect(observer, 1.0, [GridPos::new(5, 7)]);
        let expected = (1.0 / (MIN_DISTANCE_SQ + 4.0)).powi(2);
        assert!((effect - expected).abs() < 1e-12);

        let two = transfer_effect(observer, 0.5, [GridPos::new(6, 5), GridPos::new(4, 5)]);
        let each = 1.0 / (MIN_DISTANCE_SQ + 1.0);
        assert!((two - 0.5 * (2.0 * each).powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_transfer_zero_distance_is_finite() {
        let pos = GridPos::new(1, 1);
        let effect = transfer_effect(pos, 1.0, [pos]);
        assert!(effect.is_finite());
        assert!(effect > 1.0);
    }

    #[test]
    fn test_transfer_increment_capped_at_one() {
        let engine = engine(PropagandaStrategy::Transfer, GrievanceUpdate::Additive, 0.5);
        assert!((engine.updated_grievance(0.2, 100.0) - 1.2).abs() < 1e-12);
        assert!((engine.updated_grievance(0.2, 0.4) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_bandwagon_increment_not_capped() {
        let engine = engine(PropagandaStrategy::Bandwagon, GrievanceUpdate::Additive, 0.5);
        assert!((engine.updated_grievance(0.0, 4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_blend_update() {
        let engine = engine(PropagandaStrategy::Bandwagon, GrievanceUpdate::Blend, 0.25);
        let blended = engine.updated_grievance(0.4, 0.8);
        assert!((blended - (0.75 * 0.4 + 0.25 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_no_propagandists_means_no_influence() {
        let exposure = Exposure {
            observer: GridPos::new(0, 0),
            susceptibility: 1.0,
            cops_in_vision: 3,
            propagandists: &[],
        };
        let mut count = 0;
        for strategy in PropagandaStrategy::all() {
            let engine = engine(*strategy, GrievanceUpdate::Additive, 0.1);
            assert_eq!(engine.influence(&exposure, &mut count), Influence::Nothing);
        }
        assert_eq!(count, 0);
    }

    #[test]
    fn test_models_ignore_other_strategies() {
        let visible = [seen(1, 0, PropagandaStrategy::Demonizing, 1.0)];
        let exposure = Exposure {
            observer: GridPos::new(0, 0),
            susceptibility: 1.0,
            cops_in_vision: 0,
            propagandists: &visible,
        };
        let mut count = 0;
        assert_eq!(Transfer.influence(&exposure, &mut count), Influence::Nothing);
        assert_eq!(Bandwagon.influence(&exposure, &mut count), Influence::Nothing);
    }

    #[test]
    fn test_bandwagon_sums_visible_influence() {
        let visible = [
            seen(1, 0, PropagandaStrategy::Bandwagon, 0.5),
            seen(2, 0, PropagandaStrategy::Bandwagon, 0.25),
        ];
        let exposure = Exposure {
            observer: GridPos::new(0, 0),
            susceptibility: 0.8,
            cops_in_vision: 0,
            propagandists: &visible,
        };
        match Bandwagon.influence(&exposure, &mut 0) {
            Influence::Grievance { effect } => assert!((effect - 0.6).abs() < 1e-12),
            other => panic!("expected grievance effect, got {:?}", other),
        }
    }

    #[test]
    fn test_demonizing_needs_a_cop() {
        let visible = [seen(1, 0, PropagandaStrategy::Demonizing, 0.5)];
        let mut exposure = Exposure {
            observer: GridPos::new(0, 0),
            susceptibility: 0.7,
            cops_in_vision: 0,
            propagandists: &visible,
        };
        assert_eq!(
            Demonizing.influence(&exposure, &mut 0),
            Influence::Grievance { effect: 0.0 }
        );
        exposure.cops_in_vision = 2;
        assert_eq!(
            Demonizing.influence(&exposure, &mut 0),
            Influence::Grievance { effect: 0.7 }
        );
    }

    #[test]
    fn test_nationalism_discounts_risk_at_threshold_and_resets() {
        let model = Nationalism {
            exposure_threshold: 3,
            risk_divisor: 4.0,
        };
        let visible = [
            seen(1, 0, PropagandaStrategy::Nationalism, 0.5),
            seen(0, 1, PropagandaStrategy::Nationalism, 0.5),
        ];
        let exposure = Exposure {
            observer: GridPos::new(0, 0),
            susceptibility: 0.5,
            cops_in_vision: 1,
            propagandists: &visible,
        };
        let mut count = 0;
        assert_eq!(model.influence(&exposure, &mut count), Influence::Nothing);
        assert_eq!(count, 2);
        let discount = model.influence(&exposure, &mut count);
        assert_eq!(discount, Influence::RiskDiscount { divisor: 4.0 });
        assert_eq!(discount.risk_divisor(), 4.0);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_bandwagon_contribution_splits_across_targets() {
        assert!((bandwagon_contribution(1.0, &[1.0, 1.0]) - 1.0).abs() < 1e-12);
        assert!((bandwagon_contribution(2.0, &[0.5, 0.25, 0.75]) - 1.0).abs() < 1e-12);
        assert_eq!(bandwagon_contribution(1.0, &[]), 0.0);
    }

    #[test]
    fn test_additive_updates_never_lower_grievance() {
        for strategy in [
            PropagandaStrategy::Transfer,
            PropagandaStrategy::Bandwagon,
            PropagandaStrategy::Demonizing,
        ] {
            let engine = engine(strategy, GrievanceUpdate::Additive, 0.3);
            for effect in [0.0, 0.1, 1.0, 50.0] {
                assert!(engine.updated_grievance(0.0, effect) >= 0.0);
            }
        }
    }
}
