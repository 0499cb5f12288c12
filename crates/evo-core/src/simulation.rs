//! Simulation
//!
//! The aggregate root: owns all agents, trust edges, and the event
//! log, and exposes the round/selection operations plus the read-only
//! queries the presentation layer consumes.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::json;
use std::collections::BTreeMap;

use evo_events::{Event, EventType, LeaderboardEntry};

use crate::agent::{AdaptiveState, Agent, AgentId};
use crate::commitment::{self, Commitment};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::trust::TrustGraph;

/// Results from a single round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundResult {
    pub round: u64,
    /// Commitments actually resolved
    pub commitments: usize,
    /// Pairs skipped because one side could not post the stake
    pub skipped_pairs: usize,
    pub cooperations: u64,
    pub defections: u64,
    /// Total stake posted across resolved commitments
    pub stake_moved: i64,
}

/// Lifetime statistics for one strategy label, persisting after the
/// individual agents are gone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyTotals {
    pub spawned: u64,
    /// Final fitness folded in from killed agents
    pub retired_fitness: i64,
}

/// Main simulation engine.
///
/// Single-threaded and synchronous; all randomness flows through one
/// seeded generator so runs are reproducible.
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) rng: SmallRng,
    /// Agent id -> agent; key order is spawn order since ids are
    /// monotonic
    pub(crate) agents: BTreeMap<AgentId, Agent>,
    pub(crate) trust: TrustGraph,
    pub(crate) events: Vec<Event>,
    pub(crate) round: u64,
    pub(crate) next_agent_id: u64,
    pub(crate) next_event_id: u64,
    pub(crate) strategy_totals: BTreeMap<String, StrategyTotals>,
}

impl Simulation {
    /// Build an empty simulation with the given tuning and seed.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            agents: BTreeMap::new(),
            trust: TrustGraph::new(),
            events: Vec::new(),
            round: 0,
            next_agent_id: 0,
            next_event_id: 1,
            strategy_totals: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Create one agent with a fresh balance.
    ///
    /// Fails iff the strategy name is not in the configured set — the
    /// engine's only validation failure.
    pub fn create_agent(
        &mut self,
        strategy_name: &str,
        initial_balance: i64,
        adaptive: bool,
    ) -> Result<AgentId, SimError> {
        let kind = self
            .config
            .strategies
            .get(strategy_name)
            .ok_or_else(|| SimError::UnknownStrategy {
                name: strategy_name.to_string(),
            })?;

        let id = self.allocate_id();
        let mut agent = Agent::new(id, kind, initial_balance);
        if adaptive {
            agent.adaptive = Some(AdaptiveState::random(self.config.learning_rate, &mut self.rng));
        }

        let label = agent.label().to_string();
        self.strategy_totals.entry(label.clone()).or_default().spawned += 1;
        self.agents.insert(id, agent);

        self.emit(
            EventType::AgentSpawned,
            json!({
                "agent_id": id.0,
                "strategy": label,
                "adaptive": adaptive,
                "generation": 0,
            }),
        );
        Ok(id)
    }

    /// Run one round: shuffle the living population, pair adjacent
    /// agents, and resolve a commitment per pair.
    ///
    /// The round counter always advances, even when fewer than two
    /// agents are alive. An odd leftover agent sits the round out; a
    /// pair where either side cannot post the stake is skipped with no
    /// event.
    pub fn run_round(&mut self) -> RoundResult {
        self.round += 1;
        let mut result = RoundResult {
            round: self.round,
            ..RoundResult::default()
        };

        let mut alive = self.living_ids();
        if alive.len() < 2 {
            return result;
        }
        alive.shuffle(&mut self.rng);

        for pair in alive.chunks_exact(2) {
            let (id_a, id_b) = (pair[0], pair[1]);

            let stake = self.config.stake;
            let can_post = |agent: Option<&Agent>| agent.map_or(false, |a| a.balance >= stake);
            if !can_post(self.agents.get(&id_a)) || !can_post(self.agents.get(&id_b)) {
                result.skipped_pairs += 1;
                continue;
            }

            let commitment = self.resolve_pair(id_a, id_b);
            result.commitments += 1;
            result.stake_moved += stake * 2;
            for action in [commitment.action_a, commitment.action_b] {
                if action.is_cooperate() {
                    result.cooperations += 1;
                } else {
                    result.defections += 1;
                }
            }
        }

        self.emit(
            EventType::RoundCompleted,
            json!({
                "commitments": result.commitments,
                "skipped_pairs": result.skipped_pairs,
                "cooperations": result.cooperations,
                "defections": result.defections,
                "stake_moved": result.stake_moved,
            }),
        );
        tracing::debug!(
            round = result.round,
            commitments = result.commitments,
            cooperations = result.cooperations,
            defections = result.defections,
            "round completed"
        );
        result
    }

    /// Resolve one commitment between two living agents whose
    /// balances cover the stake.
    fn resolve_pair(&mut self, id_a: AgentId, id_b: AgentId) -> Commitment {
        // Take both agents out of the map to get simultaneous mutable
        // access; ids are distinct by construction of the pairing.
        let mut a = self.agents.remove(&id_a).expect("paired agent exists");
        let mut b = self.agents.remove(&id_b).expect("paired agent exists");

        let commitment =
            commitment::resolve(&mut a, &mut b, self.config.stake, &mut self.trust, &mut self.rng);

        self.agents.insert(id_a, a);
        self.agents.insert(id_b, b);

        self.emit(
            EventType::CommitmentResolved,
            json!({
                "agent_a": commitment.agent_a.0,
                "agent_b": commitment.agent_b.0,
                "stake": commitment.stake,
                "action_a": commitment.action_a,
                "action_b": commitment.action_b,
                "reward_a": commitment.reward_a,
                "reward_b": commitment.reward_b,
            }),
        );
        commitment
    }

    pub(crate) fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }

    /// Append an event to the log. Events are observability-only; no
    /// engine logic reads them back.
    pub(crate) fn emit(&mut self, event_type: EventType, payload: serde_json::Value) {
        let event_id = format!("evt_{:08}", self.next_event_id);
        self.next_event_id += 1;
        self.events.push(Event::new(event_id, self.round, event_type, payload));
    }

    // ---- read-only queries ----

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// All agents ever spawned, in spawn order (dead ones included).
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn alive_agents(&self) -> Vec<&Agent> {
        self.agents.values().filter(|a| a.alive).collect()
    }

    pub(crate) fn living_ids(&self) -> Vec<AgentId> {
        self.agents
            .values()
            .filter(|a| a.alive)
            .map(|a| a.id)
            .collect()
    }

    /// Living population counts per strategy label. Adaptive agents
    /// are counted under their own label.
    pub fn strategy_distribution(&self) -> BTreeMap<String, u64> {
        let mut distribution = BTreeMap::new();
        for agent in self.agents.values().filter(|a| a.alive) {
            *distribution.entry(agent.label().to_string()).or_insert(0) += 1;
        }
        distribution
    }

    /// Top `limit` living agents by descending fitness.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut alive = self.alive_agents();
        alive.sort_by(|a, b| b.fitness.cmp(&a.fitness).then(a.id.cmp(&b.id)));
        alive
            .into_iter()
            .take(limit)
            .map(|agent| LeaderboardEntry {
                id: agent.id.0,
                strategy: agent.label().to_string(),
                fitness: agent.fitness,
                generation: agent.generation,
                adaptive: agent.is_adaptive(),
            })
            .collect()
    }

    /// The append-only event log.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn trust(&self) -> &TrustGraph {
        &self.trust
    }

    /// Lifetime per-label spawn/fitness tallies.
    pub fn strategy_totals(&self) -> &BTreeMap<String, StrategyTotals> {
        &self.strategy_totals
    }
}
