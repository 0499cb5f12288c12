//! Event Types
//!
//! The append-only event record emitted by the simulation engine.
//! Events exist for external observability only; no engine logic
//! reads them back.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AgentSpawned,
    AgentKilled,
    CommitmentResolved,
    RoundCompleted,
    SelectionCycle,
    StrategyUpdated,
}

impl EventType {
    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::AgentSpawned,
            EventType::AgentKilled,
            EventType::CommitmentResolved,
            EventType::RoundCompleted,
            EventType::SelectionCycle,
            EventType::StrategyUpdated,
        ]
    }

    /// Wire name used in serialized logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AgentSpawned => "agent_spawned",
            EventType::AgentKilled => "agent_killed",
            EventType::CommitmentResolved => "commitment_resolved",
            EventType::RoundCompleted => "round_completed",
            EventType::SelectionCycle => "selection_cycle",
            EventType::StrategyUpdated => "strategy_updated",
        }
    }
}

/// One entry in the simulation's append-only event log.
///
/// The payload is free-form JSON; its shape depends on the event type
/// and is documented at the emission sites in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Sequential id, e.g. "evt_00000001"
    pub event_id: String,
    /// Round number at emission time
    pub round: u64,
    pub event_type: EventType,
    pub payload: Value,
}

impl Event {
    pub fn new(event_id: impl Into<String>, round: u64, event_type: EventType, payload: Value) -> Self {
        Self {
            event_id: event_id.into(),
            round,
            event_type,
            payload,
        }
    }
}
