//! Configuration System
//!
//! Model parameters, loaded from a TOML file or built in code, and validated
//! once before any simulation state exists.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::propaganda::{GrievanceUpdate, PropagandaStrategy};

/// Default parameter file path
pub const DEFAULT_CONFIG_PATH: &str = "civil_violence.toml";

/// Slack allowed when densities are summed, so fractions adding up to 1 pass
const DENSITY_TOLERANCE: f64 = 1e-9;

/// Complete parameter set for one model instance.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub height: u32,
    pub width: u32,
    /// Wrap neighbourhoods around the grid edges
    pub torus: bool,
    pub citizen_density: f64,
    pub cop_density: f64,
    pub propaganda_density: f64,
    pub citizen_vision: u32,
    pub cop_vision: u32,
    pub propaganda_vision: u32,
    /// Regime legitimacy as perceived by every citizen
    pub legitimacy: f64,
    pub max_jail_term: u32,
    /// Grievance must exceed net risk by this much for a citizen to go active
    pub active_threshold: f64,
    pub arrest_prob_constant: f64,
    pub movement: bool,
    pub max_iters: u64,
    /// When false no propaganda agents are created
    pub propaganda_allowed: bool,
    pub propaganda: PropagandaParams,
}

/// Parameters of the propaganda influence models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagandaParams {
    pub strategy: PropagandaStrategy,
    pub grievance_update: GrievanceUpdate,
    /// Weight of the propaganda effect on grievance
    pub propaganda_factor: f64,
    /// Fixed per-agent influence; drawn from U(0, 1) per agent when absent
    pub influence: Option<f64>,
    /// Accumulated bandwagon influence above which a propagandist is visible to cops
    pub exposure_threshold: f64,
    /// Exposures a citizen must accumulate before underestimating risk
    pub propaganda_exposure_threshold: u32,
    /// Net risk is divided by this when the exposure count is reached
    pub risk_divisor: f64,
}

impl Default for PropagandaParams {
    fn default() -> Self {
        Self {
            strategy: PropagandaStrategy::Transfer,
            grievance_update: GrievanceUpdate::Additive,
            propaganda_factor: 0.05,
            influence: None,
            exposure_threshold: 5.0,
            propaganda_exposure_threshold: 5,
            risk_divisor: 4.0,
        }
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            height: 40,
            width: 40,
            torus: true,
            citizen_density: 0.7,
            cop_density: 0.04,
            propaganda_density: 0.2,
            citizen_vision: 7,
            cop_vision: 7,
            propaganda_vision: 7,
            legitimacy: 0.82,
            max_jail_term: 30,
            active_threshold: 0.1,
            arrest_prob_constant: 2.3,
            movement: true,
            max_iters: 1000,
            propaganda_allowed: true,
            propaganda: PropagandaParams::default(),
        }
    }
}

impl ModelParams {
    /// Load parameters from a TOML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse parameters from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from the default path, or use defaults if it does not exist or fails to parse.
    pub fn load_or_default() -> Self {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::default();
        }
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    /// Render the parameters as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Propaganda density that actually takes effect.
    pub fn effective_propaganda_density(&self) -> f64 {
        if self.propaganda_allowed {
            self.propaganda_density
        } else {
            0.0
        }
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        for (name, value) in [
            ("citizen_density", self.citizen_density),
            ("cop_density", self.cop_density),
            ("propaganda_density", self.propaganda_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::DensityOutOfRange { name, value });
            }
        }

        let total = self.citizen_density + self.cop_density + self.effective_propaganda_density();
        if total > 1.0 + DENSITY_TOLERANCE {
            return Err(ConfigError::DensityOverflow { total });
        }

        if !(0.0..=1.0).contains(&self.legitimacy) {
            return Err(ConfigError::InvalidParameter {
                name: "legitimacy",
                value: self.legitimacy,
                reason: "must be within [0, 1]",
            });
        }

        if self.max_jail_term < 1 {
            return Err(ConfigError::InvalidJailTerm);
        }

        if !(self.arrest_prob_constant >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "arrest_prob_constant",
                value: self.arrest_prob_constant,
                reason: "must be non-negative",
            });
        }

        self.propaganda.validate()
    }
}

impl PropagandaParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.propaganda_factor) {
            return Err(ConfigError::InvalidParameter {
                name: "propaganda_factor",
                value: self.propaganda_factor,
                reason: "must be within [0, 1]",
            });
        }
        if let Some(influence) = self.influence {
            if !(influence >= 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name: "influence",
                    value: influence,
                    reason: "must be non-negative",
                });
            }
        }
        if !(self.risk_divisor > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "risk_divisor",
                value: self.risk_divisor,
                reason: "must be positive",
            });
        }
        if self.propaganda_exposure_threshold == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "propaganda_exposure_threshold",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
