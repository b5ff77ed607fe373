//! Event Types
//!
//! Discrete things that happen to individual agents during a step: arrests,
//! releases, activation changes, and propagandists being exposed to cops.

use serde::{Deserialize, Serialize};

use crate::AgentClass;

/// What happened to the subject agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The subject was arrested by `cop` and sentenced to `jail_term` steps
    Arrest {
        cop: u32,
        class: AgentClass,
        jail_term: u32,
        /// Propagandist influence left after the sentence divides it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        remaining_influence: Option<f64>,
    },
    /// The subject served its sentence and re-entered the grid
    Release,
    /// A quiescent citizen turned active
    Activated { grievance: f64, net_risk: f64 },
    /// An active citizen went quiet again
    Quiesced { grievance: f64, net_risk: f64 },
    /// A propagandist's accumulated influence made it visible to cops
    Exposed { total_influence: f64 },
    /// A propagandist dropped back below the exposure threshold
    Concealed { total_influence: f64 },
}

impl EventKind {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Arrest { .. } => "arrest",
            EventKind::Release => "release",
            EventKind::Activated { .. } => "activated",
            EventKind::Quiesced { .. } => "quiesced",
            EventKind::Exposed { .. } => "exposed",
            EventKind::Concealed { .. } => "concealed",
        }
    }
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub event_id: String,
    /// Step during which the event happened (1-based; step 0 is setup)
    pub step: u64,
    /// The agent the event happened to
    pub agent: u32,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl SimEvent {
    pub fn new(event_id: impl Into<String>, step: u64, agent: u32, kind: EventKind) -> Self {
        Self {
            event_id: event_id.into(),
            step,
            agent,
            kind,
        }
    }

    /// Checks if a specific agent is involved in this event.
    pub fn involves_agent(&self, agent: u32) -> bool {
        self.agent == agent || matches!(self.kind, EventKind::Arrest { cop, .. } if cop == agent)
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_format() {
        assert_eq!(generate_event_id(1), "evt_00000001");
        assert_eq!(generate_event_id(12345678), "evt_12345678");
    }

    #[test]
    fn test_arrest_event_json_shape() {
        let event = SimEvent::new(
            generate_event_id(7),
            3,
            42,
            EventKind::Arrest {
                cop: 5,
                class: AgentClass::Population,
                jail_term: 12,
                remaining_influence: None,
            },
        );

        let line = event.to_jsonl().unwrap();
        assert!(line.contains(r#""type":"arrest""#));
        assert!(line.contains(r#""class":"population""#));
        assert!(!line.contains("remaining_influence"));

        let parsed = SimEvent::from_jsonl(&line).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_release_event_has_no_payload() {
        let event = SimEvent::new("evt_1", 10, 8, EventKind::Release);
        let value: serde_json::Value = serde_json::from_str(&event.to_jsonl().unwrap()).unwrap();
        assert_eq!(value["type"], "release");
        assert_eq!(value["agent"], 8);
        assert_eq!(event.kind.label(), "release");
    }

    #[test]
    fn test_involves_agent_includes_arresting_cop() {
        let event = SimEvent::new(
            "evt_2",
            1,
            10,
            EventKind::Arrest {
                cop: 3,
                class: AgentClass::Propaganda,
                jail_term: 4,
                remaining_influence: Some(1.5),
            },
        );
        assert!(event.involves_agent(10));
        assert!(event.involves_agent(3));
        assert!(!event.involves_agent(4));
    }
}
