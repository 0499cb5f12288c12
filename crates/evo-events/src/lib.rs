//! Event and export schemas for the evolution simulation.
//!
//! This crate holds the wire-facing types shared between the engine
//! and anything that consumes its output: the append-only event
//! record, the event type taxonomy, and the JSON schemas for the
//! network export and status views.

pub mod event;
pub mod export;

pub use event::{Event, EventType};
pub use export::{
    AgentExport, LeaderboardEntry, NetworkExport, StatusSummary, StrategyStats, TrustEdgeExport,
};
