//! Determinism verification tests
//!
//! Identical seeds and identical command sequences must produce
//! identical simulations, event logs, and exports.

use evo_core::{export, SimConfig, Simulation};

/// Build a mixed population and drive it for a while.
fn run_scenario(seed: u64) -> Simulation {
    let config = SimConfig::default();
    let names: Vec<String> = config.strategies.names().map(String::from).collect();
    let mut sim = Simulation::new(config, seed);

    for name in &names {
        for _ in 0..4 {
            sim.create_agent(name, 1000, false).unwrap();
        }
    }
    for _ in 0..6 {
        sim.create_agent("Random", 1000, true).unwrap();
    }

    for round in 1..=40 {
        sim.run_round();
        if round % 10 == 0 {
            sim.run_selection();
        }
    }
    sim
}

#[test]
fn test_same_seed_produces_identical_runs() {
    let a = run_scenario(42);
    let b = run_scenario(42);

    assert_eq!(a.events(), b.events());
    assert_eq!(export::network_export(&a), export::network_export(&b));
    assert_eq!(export::status(&a), export::status(&b));
}

#[test]
fn test_different_seeds_diverge() {
    let a = run_scenario(42);
    let b = run_scenario(43);

    // Random policies, shuffled pairings, and random adaptive priors
    // make identical logs implausible across seeds.
    let log_a = serde_json::to_string(a.events()).unwrap();
    let log_b = serde_json::to_string(b.events()).unwrap();
    assert_ne!(log_a, log_b);
}

#[test]
fn test_round_counter_is_monotonic() {
    let mut sim = Simulation::new(SimConfig::default(), 7);
    sim.create_agent("AlwaysCooperate", 1000, false).unwrap();

    for expected in 1..=10 {
        let result = sim.run_round();
        assert_eq!(result.round, expected);
        assert_eq!(sim.round(), expected);
    }
}
