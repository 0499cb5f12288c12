//! End-to-end engine scenarios.

use evo_core::{export, AgentId, SimConfig, SimError, Simulation, StrategySet, TrustEdge};
use evo_events::EventType;

#[test]
fn test_two_cooperators_round_trip() {
    let mut sim = Simulation::new(SimConfig::default(), 1234);
    let a = sim.create_agent("AlwaysCooperate", 1000, false).unwrap();
    let b = sim.create_agent("AlwaysCooperate", 1000, false).unwrap();

    let result = sim.run_round();
    assert_eq!(result.commitments, 1);
    assert_eq!(result.cooperations, 2);
    assert_eq!(result.defections, 0);

    // 1000 - 100 + (3 * 100 / 3) = 1000 on both sides.
    for id in [a, b] {
        let agent = sim.agent(id).unwrap();
        assert_eq!(agent.balance, 1000);
        assert_eq!(agent.fitness, 1000);
        assert_eq!(agent.cooperations, 1);
        assert_eq!(agent.interactions, 1);
    }

    // One trust edge in each direction, both raised to 0.6.
    for (from, to) in [(a, b), (b, a)] {
        let edge = sim.trust().get(from, to).unwrap();
        assert!((edge.trust_score - 0.6).abs() < 1e-12);
        assert_eq!(edge.interaction_count, 1);
        assert_eq!(edge.total_stake, 100);
    }
}

#[test]
fn test_defector_exploits_cooperator_population() {
    let mut sim = Simulation::new(SimConfig::default(), 99);
    let defector = sim.create_agent("AlwaysDefect", 1000, false).unwrap();
    let victim = sim.create_agent("AlwaysCooperate", 1000, false).unwrap();

    for _ in 0..5 {
        sim.run_round();
    }

    let defector = sim.agent(defector).unwrap();
    let victim_agent = sim.agent(victim).unwrap();
    assert!(defector.fitness > victim_agent.fitness);
    assert_eq!(defector.defections, 5);

    // The victim's trust in the defector collapses to the floor.
    let edge = sim.trust().get(victim, AgentId(0)).unwrap();
    assert_eq!(edge.trust_score, 0.0);
    // The defector never cooperated, so its own edge never moved.
    let reverse = sim.trust().get(AgentId(0), victim).unwrap();
    assert_eq!(reverse.trust_score, TrustEdge::INITIAL_SCORE);
}

#[test]
fn test_grudger_retaliates_forever_in_simulation() {
    let mut sim = Simulation::new(SimConfig::default(), 5);
    let grudger = sim.create_agent("Grudger", 10_000, false).unwrap();
    let defector = sim.create_agent("AlwaysDefect", 10_000, false).unwrap();

    for _ in 0..10 {
        sim.run_round();
    }

    let grudger = sim.agent(grudger).unwrap();
    // Cooperates exactly once (the first meeting), then defects for
    // the rest of the run.
    assert_eq!(grudger.cooperations, 1);
    assert_eq!(grudger.defections, 9);

    let _ = defector;
}

#[test]
fn test_selection_counts_at_ten_and_noop_at_four() {
    let mut sim = Simulation::new(SimConfig::default(), 77);
    for _ in 0..10 {
        sim.create_agent("Random", 1000, false).unwrap();
    }
    sim.run_round();

    let result = sim.run_selection_with(0.1, 0.2);
    assert_eq!(result.killed.len(), 1);
    assert_eq!(result.spawned.len(), 2);

    let mut small = Simulation::new(SimConfig::default(), 77);
    for _ in 0..4 {
        small.create_agent("Random", 1000, false).unwrap();
    }
    small.run_round();
    let events_before = small.events().len();

    let result = small.run_selection_with(0.1, 0.2);
    assert!(result.killed.is_empty());
    assert!(result.spawned.is_empty());
    assert_eq!(small.events().len(), events_before);
}

#[test]
fn test_killed_agents_survive_in_exports() {
    let mut sim = Simulation::new(SimConfig::default(), 8);
    for _ in 0..10 {
        sim.create_agent("TitForTat", 1000, false).unwrap();
    }
    sim.run_round();
    let result = sim.run_selection();
    assert!(!result.killed.is_empty());

    let export = network_len_check(&sim);
    // All spawned agents are exported, dead ones flagged.
    assert_eq!(export, (12, 1));

    let summary = export::status(&sim);
    let stats = &summary.strategies["TitForTat"];
    assert_eq!(stats.total_spawned, 12);
    assert_eq!(stats.alive, 11);
    assert!(stats.retired_fitness > 0);
}

fn network_len_check(sim: &Simulation) -> (usize, usize) {
    let export = export::network_export(sim);
    let dead = export.agents.iter().filter(|a| !a.alive).count();
    (export.agents.len(), dead)
}

#[test]
fn test_unknown_strategy_is_the_only_creation_failure() {
    let mut config = SimConfig::default();
    config.strategies = StrategySet::empty();
    config.strategies.insert("OnlyOne", evo_core::StrategyKind::TitForTat);

    let mut sim = Simulation::new(config, 1);
    assert!(sim.create_agent("OnlyOne", 1000, false).is_ok());
    assert_eq!(
        sim.create_agent("TitForTat", 1000, false),
        Err(SimError::UnknownStrategy {
            name: "TitForTat".to_string()
        })
    );
}

#[test]
fn test_event_log_is_append_only_and_typed() {
    let mut sim = Simulation::new(SimConfig::default(), 3);
    for _ in 0..6 {
        sim.create_agent("Pavlov", 1000, false).unwrap();
    }
    sim.run_round();
    sim.run_selection();

    let events = sim.events();
    // Sequential ids.
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.event_id, format!("evt_{:08}", i + 1));
    }
    assert_eq!(
        events
            .iter()
            .filter(|e| e.event_type == EventType::AgentSpawned)
            .count(),
        6 + 1
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| e.event_type == EventType::SelectionCycle)
            .count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| e.event_type == EventType::CommitmentResolved)
            .count(),
        3
    );
}
