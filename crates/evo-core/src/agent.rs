//! Agents
//!
//! Mutable simulation participants: balance, per-opponent history,
//! counters, and (for adaptive agents) the learned decision weights.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::strategy::{Action, InteractionHistory, StrategyKind};

/// Label under which adaptive agents appear in distributions and
/// exports, distinct from their fixed-rule namesakes.
pub const ADAPTIVE_LABEL: &str = "Adaptive";

/// Unique identifier for an agent. Assigned by the simulation from a
/// monotonic counter and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{}", self.0)
    }
}

/// Learned decision parameters for an adaptive agent.
///
/// Weight layout: `[cooperation_bias, defection_bias, trust_factor,
/// retaliation_factor]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveState {
    pub weights: [f64; 4],
    pub learning_rate: f64,
    /// Fitness at the last accepted update; updates only happen on
    /// strict improvement over this
    pub baseline_fitness: i64,
    pub update_count: u64,
}

impl AdaptiveState {
    /// Fresh weights drawn from a deliberately defection-biased prior:
    /// cooperation has to be learned away from it.
    pub fn random(learning_rate: f64, rng: &mut SmallRng) -> Self {
        Self {
            weights: [
                rng.gen_range(-1.0..=0.0),
                rng.gen_range(0.5..=1.5),
                rng.gen_range(0.0..=0.5),
                rng.gen_range(0.5..=1.0),
            ],
            learning_rate,
            baseline_fitness: 0,
            update_count: 0,
        }
    }

    /// Child state: the parent's weights perturbed independently per
    /// component, with learning progress reset.
    pub fn inherit(parent: &AdaptiveState, rng: &mut SmallRng) -> Self {
        let mut weights = parent.weights;
        for w in &mut weights {
            *w += rng.gen_range(-0.1..=0.1);
        }
        Self {
            weights,
            learning_rate: parent.learning_rate,
            baseline_fitness: 0,
            update_count: 0,
        }
    }

    /// 4-weight linear rule over the opponent's last recorded action.
    /// Ties favor defection.
    pub fn decide(&self, history: Option<&InteractionHistory>) -> Action {
        let mut coop = self.weights[0];
        let mut defect = self.weights[1];
        match history.and_then(|h| h.last_opponent_action()) {
            Some(Action::Cooperate) => coop += self.weights[2],
            Some(Action::Defect) => defect += self.weights[3],
            None => {}
        }
        if coop > defect {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// One simulated participant.
///
/// Created by the simulation (fresh spawn or reproduction) and mutated
/// only through commitment resolution and selection. Killed agents are
/// marked dead but retained for reporting.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub strategy: StrategyKind,
    /// Present iff the agent decides with the learned rule instead of
    /// its fixed strategy
    pub adaptive: Option<AdaptiveState>,
    pub balance: i64,
    /// Current balance, snapshotted after every interaction
    pub fitness: i64,
    pub generation: u32,
    pub alive: bool,
    pub interactions: u64,
    pub cooperations: u64,
    pub defections: u64,
    history: HashMap<AgentId, InteractionHistory>,
}

impl Agent {
    pub fn new(id: AgentId, strategy: StrategyKind, balance: i64) -> Self {
        Self {
            id,
            strategy,
            adaptive: None,
            balance,
            fitness: 0,
            generation: 0,
            alive: true,
            interactions: 0,
            cooperations: 0,
            defections: 0,
            history: HashMap::new(),
        }
    }

    pub fn is_adaptive(&self) -> bool {
        self.adaptive.is_some()
    }

    /// Strategy label for distributions and exports. Adaptive agents
    /// report a distinct label regardless of inherited strategy name.
    pub fn label(&self) -> &'static str {
        if self.is_adaptive() {
            ADAPTIVE_LABEL
        } else {
            self.strategy.name()
        }
    }

    pub fn history_with(&self, opponent: AgentId) -> Option<&InteractionHistory> {
        self.history.get(&opponent)
    }

    /// Choose an action against the given opponent using only the
    /// shared history with that opponent.
    pub fn decide(&self, opponent: AgentId, rng: &mut SmallRng) -> Action {
        let history = self.history_with(opponent);
        match &self.adaptive {
            Some(state) => state.decide(history),
            None => self.strategy.decide(history, rng),
        }
    }

    /// Append a realized action pair to the shared history and advance
    /// the lifetime counters.
    pub fn record_interaction(&mut self, opponent: AgentId, mine: Action, theirs: Action) {
        self.history.entry(opponent).or_default().record(mine, theirs);
        self.interactions += 1;
        if mine.is_cooperate() {
            self.cooperations += 1;
        } else {
            self.defections += 1;
        }
    }

    /// cooperations / interactions, 0.0 before any interaction.
    pub fn cooperation_rate(&self) -> f64 {
        if self.interactions == 0 {
            0.0
        } else {
            self.cooperations as f64 / self.interactions as f64
        }
    }
}
