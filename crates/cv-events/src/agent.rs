//! Agent Tags
//!
//! The closed set of agent classes and the grid coordinate shared by every record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator for the three kinds of agent on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentClass {
    /// Citizen who can turn active and be jailed
    Population,
    /// Arrests active citizens and exposed propagandists
    Cop,
    /// Spreads propaganda to nearby citizens
    Propaganda,
}

impl AgentClass {
    /// Returns all agent class variants.
    pub fn all() -> &'static [AgentClass] {
        &[AgentClass::Population, AgentClass::Cop, AgentClass::Propaganda]
    }

    /// Whether agents of this class can be sentenced.
    pub fn can_be_jailed(&self) -> bool {
        !matches!(self, AgentClass::Cop)
    }
}

impl fmt::Display for AgentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentClass::Population => write!(f, "population"),
            AgentClass::Cop => write!(f, "cop"),
            AgentClass::Propaganda => write!(f, "propaganda"),
        }
    }
}

/// Grid coordinate as `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_class_serialization() {
        assert_eq!(serde_json::to_string(&AgentClass::Population).unwrap(), r#""population""#);
        assert_eq!(serde_json::to_string(&AgentClass::Cop).unwrap(), r#""cop""#);
        assert_eq!(serde_json::to_string(&AgentClass::Propaganda).unwrap(), r#""propaganda""#);
        assert_eq!(
            serde_json::from_str::<AgentClass>(r#""propaganda""#).unwrap(),
            AgentClass::Propaganda
        );
    }

    #[test]
    fn test_only_cops_are_never_jailed() {
        assert!(AgentClass::Population.can_be_jailed());
        assert!(AgentClass::Propaganda.can_be_jailed());
        assert!(!AgentClass::Cop.can_be_jailed());
        assert_eq!(AgentClass::all().len(), 3);
    }

    #[test]
    fn test_grid_pos_display() {
        assert_eq!(GridPos::new(3, 14).to_string(), "(3, 14)");
    }
}
