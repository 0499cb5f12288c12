//! Evolution simulation demo binary.
//!
//! Thin presentation layer over the engine: builds a population from
//! the CLI arguments, advances rounds with a periodic selection cycle,
//! prints progress, and dumps the event log and network export at the
//! end. Everything here goes through the engine's public commands and
//! read-only queries.

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use evo_core::{export, EventLogger, SimConfig, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "evo_sim")]
#[command(about = "An evolutionary cooperation simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of rounds to simulate
    #[arg(long, default_value_t = 100)]
    rounds: u64,

    /// Interval between selection cycles (in rounds)
    #[arg(long, default_value_t = 20)]
    selection_interval: u64,

    /// Fixed-strategy agents spawned per configured strategy
    #[arg(long, default_value_t = 8)]
    agents_per_strategy: usize,

    /// Adaptive agents spawned on top of the fixed population
    #[arg(long, default_value_t = 10)]
    adaptive_agents: usize,

    /// Optional TOML tuning file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the event log and export files
    #[arg(long, default_value = "output")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::load_or_default(),
    };

    println!("Evolution Simulation");
    println!("====================");
    println!("Seed: {}", args.seed);
    println!("Rounds: {}", args.rounds);
    println!("Selection interval: {}", args.selection_interval);
    println!("Stake: {}", config.stake);
    println!();

    fs::create_dir_all(&args.output)?;

    let initial_balance = config.initial_balance;
    let strategy_names: Vec<String> = config.strategies.names().map(String::from).collect();
    if strategy_names.is_empty() {
        return Err("configured strategy set is empty".into());
    }
    let mut sim = Simulation::new(config, args.seed);

    println!("Spawning agents...");
    for name in &strategy_names {
        for _ in 0..args.agents_per_strategy {
            sim.create_agent(name, initial_balance, false)?;
        }
    }
    // Adaptive agents inherit a strategy name for lineage but decide
    // with their learned weights.
    for i in 0..args.adaptive_agents {
        let name = &strategy_names[i % strategy_names.len()];
        sim.create_agent(name, initial_balance, true)?;
    }
    println!("  Spawned {} agents ({} adaptive)", sim.agents().count(), args.adaptive_agents);
    println!();

    println!("Running simulation...");
    for round in 1..=args.rounds {
        sim.run_round();

        if args.selection_interval > 0 && round % args.selection_interval == 0 {
            let result = sim.run_selection();
            println!(
                "[Round {:>4}] selection: killed {}, spawned {}, alive {}",
                round,
                result.killed.len(),
                result.spawned.len(),
                sim.alive_agents().len()
            );
            print_status(&sim);
        }
    }

    println!();
    println!("Final results:");
    print_status(&sim);

    println!();
    println!("Top performers:");
    for (rank, entry) in sim.leaderboard(5).iter().enumerate() {
        let tag = if entry.adaptive { " [adaptive]" } else { "" };
        println!(
            "  {}. agent_{} ({}{}): fitness={} gen={}",
            rank + 1,
            entry.id,
            entry.strategy,
            tag,
            entry.fitness,
            entry.generation
        );
    }

    // Dump the event log and export views.
    let events_path = args.output.join("events.jsonl");
    let mut logger = EventLogger::new(&events_path)?;
    logger.log_batch(sim.events())?;
    logger.flush()?;
    println!();
    println!("Wrote {} events to {}", logger.written(), events_path.display());

    let network_path = args.output.join("network.json");
    export::write_network_export(&export::network_export(&sim), &network_path)?;
    println!("Wrote {}", network_path.display());

    let status_path = args.output.join("status.json");
    export::write_status(&export::status(&sim), &status_path)?;
    println!("Wrote {}", status_path.display());

    Ok(())
}

/// Print the per-strategy population table.
fn print_status(sim: &Simulation) {
    let summary = export::status(sim);
    println!(
        "  Round {} | alive {}/{} | events {}",
        summary.round, summary.alive_agents, summary.total_agents, summary.event_count
    );
    for (label, stats) in &summary.strategies {
        if stats.alive == 0 {
            continue;
        }
        println!(
            "    {:<16} {:>3} alive  avg fitness {:>6}  coop {:>5.1}%",
            label,
            stats.alive,
            stats.avg_fitness,
            stats.avg_cooperation_rate * 100.0
        );
    }
}
