//! Export Views
//!
//! Builds the read-only network-export and status views from the
//! simulation. These are the only surfaces the presentation layer
//! consumes; the engine owns no file format beyond the JSON written
//! here on its behalf.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use evo_events::{AgentExport, NetworkExport, StatusSummary, StrategyStats, TrustEdgeExport};

use crate::simulation::Simulation;

/// Build the full network export: every agent ever spawned, plus all
/// trust edges with at least one interaction.
pub fn network_export(sim: &Simulation) -> NetworkExport {
    let agents = sim
        .agents()
        .map(|agent| AgentExport {
            id: agent.id.0,
            strategy: agent.label().to_string(),
            fitness: agent.fitness,
            balance: agent.balance,
            alive: agent.alive,
            generation: agent.generation,
            interactions: agent.interactions,
            cooperations: agent.cooperations,
            defections: agent.defections,
            cooperation_rate: agent.cooperation_rate(),
        })
        .collect();

    let mut edges: Vec<TrustEdgeExport> = sim
        .trust()
        .iter()
        .filter(|(_, edge)| edge.interaction_count > 0)
        .map(|(&(from, to), edge)| TrustEdgeExport {
            source: from.0,
            target: to.0,
            trust_score: edge.trust_score,
            interaction_count: edge.interaction_count,
            total_stake: edge.total_stake,
        })
        .collect();
    // The trust graph is hash-ordered; sort for stable output.
    edges.sort_by_key(|e| (e.source, e.target));

    NetworkExport {
        round: sim.round(),
        agents,
        edges,
    }
}

/// Build the aggregate status summary with the per-strategy breakdown.
pub fn status(sim: &Simulation) -> StatusSummary {
    let mut strategies: BTreeMap<String, StrategyStats> = sim
        .strategy_totals()
        .iter()
        .map(|(label, totals)| {
            (
                label.clone(),
                StrategyStats {
                    total_spawned: totals.spawned,
                    retired_fitness: totals.retired_fitness,
                    ..StrategyStats::default()
                },
            )
        })
        .collect();

    let mut fitness_sums: BTreeMap<String, i64> = BTreeMap::new();
    let mut coop_sums: BTreeMap<String, (f64, u64)> = BTreeMap::new();

    for agent in sim.agents().filter(|a| a.alive) {
        let label = agent.label().to_string();
        strategies.entry(label.clone()).or_default().alive += 1;
        *fitness_sums.entry(label.clone()).or_insert(0) += agent.fitness;
        if agent.interactions > 0 {
            let entry = coop_sums.entry(label).or_insert((0.0, 0));
            entry.0 += agent.cooperation_rate();
            entry.1 += 1;
        }
    }

    for (label, stats) in strategies.iter_mut() {
        if stats.alive > 0 {
            stats.avg_fitness = fitness_sums.get(label).copied().unwrap_or(0) / stats.alive as i64;
        }
        if let Some(&(sum, count)) = coop_sums.get(label) {
            if count > 0 {
                stats.avg_cooperation_rate = sum / count as f64;
            }
        }
    }

    StatusSummary {
        round: sim.round(),
        total_agents: sim.agents().count() as u64,
        alive_agents: sim.alive_agents().len() as u64,
        event_count: sim.events().len() as u64,
        strategies,
    }
}

/// Write the network export as pretty-printed JSON.
pub fn write_network_export(export: &NetworkExport, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    fs::write(path, json)
}

/// Write the status summary as pretty-printed JSON.
pub fn write_status(summary: &StatusSummary, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn two_agent_sim() -> Simulation {
        let mut sim = Simulation::new(SimConfig::default(), 21);
        sim.create_agent("AlwaysCooperate", 1000, false).unwrap();
        sim.create_agent("AlwaysDefect", 1000, false).unwrap();
        sim.run_round();
        sim
    }

    #[test]
    fn test_network_export_contains_all_agents_and_live_edges() {
        let sim = two_agent_sim();
        let export = network_export(&sim);

        assert_eq!(export.round, 1);
        assert_eq!(export.agents.len(), 2);
        assert_eq!(export.edges.len(), 2);
        for edge in &export.edges {
            assert_eq!(edge.interaction_count, 1);
            assert_eq!(edge.total_stake, 100);
        }
        // Sorted by (source, target).
        assert!(export.edges[0].source <= export.edges[1].source);
    }

    #[test]
    fn test_edges_without_interactions_are_excluded() {
        let mut sim = Simulation::new(SimConfig::default(), 21);
        sim.create_agent("AlwaysCooperate", 1000, false).unwrap();
        let export = network_export(&sim);
        assert!(export.edges.is_empty());
    }

    #[test]
    fn test_status_breaks_down_by_label() {
        let sim = two_agent_sim();
        let summary = status(&sim);

        assert_eq!(summary.total_agents, 2);
        assert_eq!(summary.alive_agents, 2);
        assert!(summary.event_count > 0);

        let cooperator = &summary.strategies["AlwaysCooperate"];
        assert_eq!(cooperator.alive, 1);
        assert_eq!(cooperator.total_spawned, 1);
        assert_eq!(cooperator.avg_fitness, 900);
        assert_eq!(cooperator.avg_cooperation_rate, 1.0);

        let defector = &summary.strategies["AlwaysDefect"];
        assert_eq!(defector.avg_fitness, 1066);
        assert_eq!(defector.avg_cooperation_rate, 0.0);
    }

    #[test]
    fn test_export_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let sim = two_agent_sim();

        let export_path = dir.path().join("network.json");
        write_network_export(&network_export(&sim), &export_path).unwrap();
        let parsed: NetworkExport =
            serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
        assert_eq!(parsed.agents.len(), 2);

        let status_path = dir.path().join("status.json");
        write_status(&status(&sim), &status_path).unwrap();
        assert!(status_path.exists());
    }
}
