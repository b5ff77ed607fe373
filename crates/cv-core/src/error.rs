//! Error Types
//!
//! Configuration errors are raised once, at model construction. Grid and
//! simulation errors signal a broken invariant during stepping and are
//! propagated out of `Model::step` rather than patched over.

use bevy_ecs::entity::Entity;
use cv_events::GridPos;
use std::path::PathBuf;
use thiserror::Error;

use crate::components::AgentId;

/// Invalid or unreadable model parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{name} must be within [0, 1], got {value}")]
    DensityOutOfRange { name: &'static str, value: f64 },

    #[error("agent densities sum to {total}, which exceeds 1")]
    DensityOverflow { total: f64 },

    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("max_jail_term must be at least 1")]
    InvalidJailTerm,

    #[error("{name} = {value} is invalid: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Violations of the one-agent-per-cell grid contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {0} is already occupied")]
    CellOccupied(GridPos),

    #[error("cell {0} is empty")]
    EmptyCell(GridPos),

    #[error("cell {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: GridPos, width: u32, height: u32 },

    #[error("no empty cell left on the grid")]
    Full,
}

/// Errors raised while building or stepping a model.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),

    #[error("activation order names {got} agents but the model has {expected}")]
    IncompleteOrder { expected: usize, got: usize },

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_error_messages() {
        let err = GridError::OutOfBounds {
            pos: GridPos::new(5, 9),
            width: 4,
            height: 4,
        };
        assert_eq!(err.to_string(), "cell (5, 9) is outside the 4x4 grid");
        assert_eq!(
            GridError::CellOccupied(GridPos::new(1, 1)).to_string(),
            "cell (1, 1) is already occupied"
        );
    }

    #[test]
    fn test_config_error_converts_into_sim_error() {
        let err: SimError = ConfigError::DensityOverflow { total: 1.2 }.into();
        assert!(matches!(err, SimError::Config(ConfigError::DensityOverflow { .. })));
        assert_eq!(err.to_string(), "agent densities sum to 1.2, which exceeds 1");
    }
}
