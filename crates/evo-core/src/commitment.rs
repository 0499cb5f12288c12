//! Commitments
//!
//! Resolution of one paired game between two agents: decisions,
//! payoff application, history and trust updates.

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId};
use crate::strategy::{payoff, Action};
use crate::trust::TrustGraph;

/// Immutable record of one resolved interaction. Never re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub agent_a: AgentId,
    pub agent_b: AgentId,
    pub stake: i64,
    pub action_a: Action,
    pub action_b: Action,
    pub reward_a: i64,
    pub reward_b: i64,
}

/// Matrix payoff converted into a balance delta.
///
/// Canonical convention: the payoff is normalized around the stake
/// with integer floor division, so mutual cooperation exactly returns
/// the stake. See DESIGN.md for the resolution of the historical
/// ambiguity here.
pub fn scale_reward(payoff: i64, stake: i64) -> i64 {
    payoff * stake / 3
}

/// Resolve one commitment between two living agents.
///
/// Caller guarantees both balances cover the stake. Each agent
/// decides from the shared history with the counterpart only; both
/// balances, fitness scores, histories, counters, and both directed
/// trust edges are updated. Total given valid preconditions.
pub fn resolve(
    a: &mut Agent,
    b: &mut Agent,
    stake: i64,
    trust: &mut TrustGraph,
    rng: &mut SmallRng,
) -> Commitment {
    let action_a = a.decide(b.id, rng);
    let action_b = b.decide(a.id, rng);

    let (payoff_a, payoff_b) = payoff(action_a, action_b);
    let reward_a = scale_reward(payoff_a, stake);
    let reward_b = scale_reward(payoff_b, stake);

    a.balance = a.balance - stake + reward_a;
    b.balance = b.balance - stake + reward_b;
    a.fitness = a.balance;
    b.fitness = b.balance;

    a.record_interaction(b.id, action_a, action_b);
    b.record_interaction(a.id, action_b, action_a);

    trust.record_interaction(a.id, b.id, action_a, action_b, stake);

    Commitment {
        agent_a: a.id,
        agent_b: b.id,
        stake,
        action_a,
        action_b,
        reward_a,
        reward_b,
    }
}
