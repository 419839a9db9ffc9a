//! Viral Spread Simulation
//!
//! Run with: cargo run --bin diffusion_sim [--seed SEED_HEX] [--events]

mod diffusion;

use std::env;
use std::process;

use diffusion::{print_history, print_summary, LoggingEventSink};
use log::{error, info};
use simple_logger::SimpleLogger;
use vs_rust::vs_config::parse_seed_hex;
use vs_rust::{DiffusionConfig, DiffusionEngine};

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();
    let mut config = DiffusionConfig::default();
    let mut enable_events = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" if i + 1 < args.len() => {
                config.seed = match parse_seed_hex(&args[i + 1]) {
                    Ok(seed) => Some(seed),
                    Err(e) => {
                        error!("{}", e);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--events" => enable_events = true,
            other => {
                eprintln!("Usage: {} [--seed SEED_HEX] [--events]", args[0]);
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║        Viral Spread Simulator                          ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    info!("Configuration:");
    info!("  Persons: {}", config.num_persons);
    info!("  Connection radius: {}", config.connection_radius);
    info!("  Influencer reach: {}", config.influencer_reach_fraction);
    info!("  Influencer convince prob: {}", config.influencer_convince_prob);
    info!("  Friend single prob: {}", config.friend_single_prob);
    info!("  Friend multiple prob: {}", config.friend_multiple_prob);
    info!("  Peer rounds: {}", config.rounds);

    let labels = config.labels;
    let engine = match DiffusionEngine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    let mut engine = engine.with_sink(LoggingEventSink::new(enable_events));

    let summary = match engine.run() {
        Ok(summary) => summary,
        Err(e) => {
            error!("simulation aborted: {}", e);
            process::exit(1);
        }
    };

    print_history(engine.history());
    print_summary(&summary, engine.network(), labels, engine.seed_used());

    info!("✓ Simulation complete!");
}
