//! Trust Edges
//!
//! Directed pairwise trust state derived from interaction outcomes.
//! Edges are created lazily on first interaction and never deleted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::agent::AgentId;
use crate::strategy::Action;

/// Trust gained when both sides cooperate.
const MUTUAL_COOPERATION_BONUS: f64 = 0.1;
/// Trust lost when the owner cooperated and the opponent defected.
const BETRAYAL_PENALTY: f64 = 0.2;

/// Directed trust state from one agent toward another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEdge {
    /// Confidence estimate, clamped to [0.0, 1.0] after every update
    pub trust_score: f64,
    /// Cumulative stake committed across the pair
    pub total_stake: i64,
    pub interaction_count: u64,
}

impl TrustEdge {
    pub const INITIAL_SCORE: f64 = 0.5;

    /// Classify one outcome from the owner's perspective and update.
    ///
    /// Mutual cooperation raises trust, a betrayal (owner cooperated,
    /// opponent defected) lowers it, and any outcome where the owner
    /// defected leaves the score unchanged. The counters always
    /// advance.
    pub fn record_outcome(&mut self, own: Action, opponent: Action, stake: i64) {
        match (own, opponent) {
            (Action::Cooperate, Action::Cooperate) => {
                self.trust_score = (self.trust_score + MUTUAL_COOPERATION_BONUS).min(1.0);
            }
            (Action::Cooperate, Action::Defect) => {
                self.trust_score = (self.trust_score - BETRAYAL_PENALTY).max(0.0);
            }
            _ => {}
        }
        self.interaction_count += 1;
        self.total_stake += stake;
    }
}

impl Default for TrustEdge {
    fn default() -> Self {
        Self {
            trust_score: Self::INITIAL_SCORE,
            total_stake: 0,
            interaction_count: 0,
        }
    }
}

/// All directed trust edges, keyed by (from, to).
#[derive(Debug, Clone, Default)]
pub struct TrustGraph {
    edges: HashMap<(AgentId, AgentId), TrustEdge>,
}

impl TrustGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, from: AgentId, to: AgentId) -> Option<&TrustEdge> {
        self.edges.get(&(from, to))
    }

    /// Create or get the directed edge (ensures it exists).
    pub fn ensure_edge(&mut self, from: AgentId, to: AgentId) -> &mut TrustEdge {
        self.edges.entry((from, to)).or_default()
    }

    /// Apply one resolved interaction to both directed edges of the
    /// pair.
    pub fn record_interaction(
        &mut self,
        a: AgentId,
        b: AgentId,
        action_a: Action,
        action_b: Action,
        stake: i64,
    ) {
        self.ensure_edge(a, b).record_outcome(action_a, action_b, stake);
        self.ensure_edge(b, a).record_outcome(action_b, action_a, stake);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(AgentId, AgentId), &TrustEdge)> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
