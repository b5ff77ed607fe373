//! Event Logger
//!
//! Append-only JSONL event logging, fed from the per-step event buffer.

use bevy_ecs::prelude::*;
use cv_events::{generate_event_id, EventKind, SimEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::components::AgentId;

/// Events raised by agents during the current step
#[derive(Resource, Debug, Default)]
pub struct StepEvents {
    step: u64,
    next_sequence: u64,
    events: Vec<SimEvent>,
}

impl StepEvents {
    pub fn new() -> Self {
        Self {
            step: 0,
            next_sequence: 1,
            events: Vec::new(),
        }
    }

    /// Label subsequent events with `step`.
    pub fn begin_step(&mut self, step: u64) {
        self.step = step;
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// Record an event for `agent` at the current step.
    pub fn push(&mut self, agent: AgentId, kind: EventKind) {
        let sequence = self.next_sequence.max(1);
        self.next_sequence = sequence + 1;
        self.events
            .push(SimEvent::new(generate_event_id(sequence), self.step, agent.0, kind));
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Writes events to a JSONL file
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
        })
    }

    /// Create a logger that discards events (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn log(&mut self, event: &SimEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, events: &[SimEvent]) -> std::io::Result<()> {
        for event in events {
            self.log(event)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush event logger: {}", e);
        }
    }
}
