//! Selection Cycle
//!
//! Periodic culling and reproduction over the living population, and
//! the experience-driven weight update for adaptive agents that runs
//! at the start of every cycle.

use serde_json::json;

use evo_events::EventType;

use crate::agent::{AdaptiveState, Agent, AgentId};
use crate::simulation::Simulation;

/// Minimum living population for a selection cycle to run.
const MIN_POPULATION: usize = 5;
/// Improvement that saturates the gradient scale.
const IMPROVEMENT_SATURATION: f64 = 100.0;

/// Results from one selection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub killed: Vec<AgentId>,
    pub spawned: Vec<AgentId>,
}

impl Simulation {
    /// Run one selection cycle with the configured fractions.
    pub fn run_selection(&mut self) -> SelectionResult {
        let (kill_fraction, reproduce_fraction) =
            (self.config.kill_fraction, self.config.reproduce_fraction);
        self.run_selection_with(kill_fraction, reproduce_fraction)
    }

    /// Run one selection cycle with explicit kill/reproduce fractions.
    ///
    /// The adaptive update pass runs first; then the living population
    /// is ranked by fitness ascending, the bottom `max(1, floor(n *
    /// kill_fraction))` agents are killed, and the top `max(1,
    /// floor(n * reproduce_fraction))` each spawn one child. Below
    /// five living agents the cycle neither kills nor reproduces.
    pub fn run_selection_with(
        &mut self,
        kill_fraction: f64,
        reproduce_fraction: f64,
    ) -> SelectionResult {
        self.adaptive_update_pass();

        let mut ranked: Vec<(AgentId, i64)> = self
            .agents
            .values()
            .filter(|a| a.alive)
            .map(|a| (a.id, a.fitness))
            .collect();
        let n = ranked.len();
        if n < MIN_POPULATION {
            return SelectionResult::default();
        }

        // Stable sort over spawn-ordered input keeps ties
        // deterministic.
        ranked.sort_by_key(|&(_, fitness)| fitness);

        let kill_count = ((n as f64 * kill_fraction) as usize).max(1);
        let reproduce_count = ((n as f64 * reproduce_fraction) as usize).max(1);

        let mut result = SelectionResult::default();
        for &(id, _) in ranked.iter().take(kill_count) {
            self.kill_agent(id);
            result.killed.push(id);
        }
        for &(parent, _) in ranked.iter().rev().take(reproduce_count) {
            result.spawned.push(self.spawn_child(parent));
        }

        self.emit(
            EventType::SelectionCycle,
            json!({
                "killed": result.killed.iter().map(|id| id.0).collect::<Vec<_>>(),
                "spawned": result.spawned.iter().map(|id| id.0).collect::<Vec<_>>(),
                "population": self.alive_agents().len(),
            }),
        );
        tracing::info!(
            round = self.round,
            killed = result.killed.len(),
            spawned = result.spawned.len(),
            "selection cycle"
        );
        result
    }

    /// Mark an agent dead. Irreversible; history is retained and its
    /// final fitness folds into the per-label lifetime tally.
    fn kill_agent(&mut self, id: AgentId) {
        let (label, fitness, interactions) = {
            let agent = self.agents.get_mut(&id).expect("ranked agent exists");
            agent.alive = false;
            (agent.label().to_string(), agent.fitness, agent.interactions)
        };
        self.strategy_totals.entry(label).or_default().retired_fitness += fitness;

        self.emit(
            EventType::AgentKilled,
            json!({
                "agent_id": id.0,
                "final_fitness": fitness,
                "interactions": interactions,
            }),
        );
    }

    /// Spawn one child of a high-fitness parent: fresh balance, same
    /// strategy name and adaptive flag, generation advanced, weights
    /// mutated when inherited.
    fn spawn_child(&mut self, parent_id: AgentId) -> AgentId {
        let parent = self.agents.get(&parent_id).expect("ranked agent exists");
        let strategy = parent.strategy;
        let generation = parent.generation + 1;
        let parent_state = parent.adaptive.clone();

        let id = self.allocate_id();
        let mut child = Agent::new(id, strategy, self.config.initial_balance);
        child.generation = generation;
        child.adaptive = parent_state.map(|state| AdaptiveState::inherit(&state, &mut self.rng));

        let label = child.label().to_string();
        let adaptive = child.is_adaptive();
        self.strategy_totals.entry(label.clone()).or_default().spawned += 1;
        self.agents.insert(id, child);

        self.emit(
            EventType::AgentSpawned,
            json!({
                "agent_id": id.0,
                "strategy": label,
                "adaptive": adaptive,
                "generation": generation,
                "parent": parent_id.0,
            }),
        );
        id
    }

    /// Learning pass over all living adaptive agents.
    ///
    /// An agent only updates when its fitness strictly improved since
    /// its last baseline; the weights are blended toward a target
    /// derived from its realized cooperation rate, scaled by how large
    /// the improvement was.
    pub(crate) fn adaptive_update_pass(&mut self) {
        let mut updates = Vec::new();

        for agent in self.agents.values_mut().filter(|a| a.alive) {
            let fitness = agent.fitness;
            let (interactions, cooperations) = (agent.interactions, agent.cooperations);
            let Some(state) = agent.adaptive.as_mut() else {
                continue;
            };
            if fitness <= state.baseline_fitness {
                // Sticky under regression.
                continue;
            }

            let improvement = fitness - state.baseline_fitness;
            let gradient_scale = (improvement as f64 / IMPROVEMENT_SATURATION).min(1.0);
            let coop_rate = if interactions == 0 {
                0.5
            } else {
                cooperations as f64 / interactions as f64
            };
            let target = [
                2.0 * coop_rate - 1.0,
                2.0 * (1.0 - coop_rate) - 1.0,
                coop_rate,
                1.0 - coop_rate,
            ];

            let lr = state.learning_rate;
            for (weight, target) in state.weights.iter_mut().zip(target) {
                *weight = *weight * (1.0 - lr) + target * lr * gradient_scale;
            }
            state.baseline_fitness = fitness;
            state.update_count += 1;

            updates.push(json!({
                "agent_id": agent.id.0,
                "improvement": improvement,
                "update_count": state.update_count,
                "weights": state.weights,
            }));
        }

        for payload in updates {
            self.emit(EventType::StrategyUpdated, payload);
        }
    }
}
