//! Export Schemas
//!
//! JSON schemas for the read-only views the engine exposes to its
//! presentation collaborator: the trust-network export, the status
//! summary, and the fitness leaderboard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-agent row of the network export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentExport {
    pub id: u64,
    /// Strategy label; adaptive agents carry a distinct label
    pub strategy: String,
    pub fitness: i64,
    pub balance: i64,
    pub alive: bool,
    pub generation: u32,
    pub interactions: u64,
    pub cooperations: u64,
    pub defections: u64,
    /// cooperations / interactions, 0.0 before any interaction
    pub cooperation_rate: f64,
}

/// Directed trust edge of the network export.
///
/// Only edges with at least one interaction are exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEdgeExport {
    pub source: u64,
    pub target: u64,
    pub trust_score: f64,
    pub interaction_count: u64,
    pub total_stake: i64,
}

/// Complete view of the population and its trust network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkExport {
    pub round: u64,
    pub agents: Vec<AgentExport>,
    pub edges: Vec<TrustEdgeExport>,
}

/// Lifetime statistics for one strategy label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyStats {
    /// Currently living agents with this label
    pub alive: u64,
    /// All agents ever spawned with this label
    pub total_spawned: u64,
    /// Mean fitness over living agents
    pub avg_fitness: i64,
    /// Mean cooperation rate over living agents with interactions
    pub avg_cooperation_rate: f64,
    /// Final fitness folded in from killed agents
    pub retired_fitness: i64,
}

/// Aggregate snapshot of the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub round: u64,
    pub total_agents: u64,
    pub alive_agents: u64,
    pub event_count: u64,
    /// Per-strategy breakdown, keyed by label
    pub strategies: BTreeMap<String, StrategyStats>,
}

/// One row of the fitness leaderboard (descending fitness).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u64,
    pub strategy: String,
    pub fitness: i64,
    pub generation: u32,
    pub adaptive: bool,
}
