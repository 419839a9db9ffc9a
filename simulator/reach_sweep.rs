// Reach Sweep - influencer reach vs. convince probability
//
// Runs the default campaign over a grid of influencer reach fractions and
// convince probabilities. Each cell is averaged over several seeds derived
// from one base seed, so the whole table is reproducible.
//
// Usage:
//   cargo run --bin reach_sweep [--runs N] [--seed SEED_HEX]

use std::env;
use std::process;

use log::{error, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use simple_logger::SimpleLogger;
use vs_rust::vs_config::parse_seed_hex;
use vs_rust::{DiffusionConfig, DiffusionEngine, SimResult};

const REACH_FRACTIONS: [f64; 6] = [0.05, 0.1, 0.15, 0.3, 0.5, 0.8];
const CONVINCE_PROBS: [f64; 4] = [0.05, 0.1, 0.2, 0.5];

/// Mean direct and total buyer percentage over `runs` seeds
fn run_cell(base: &DiffusionConfig, seeds: &[[u8; 32]]) -> SimResult<(f64, f64)> {
    let mut direct = 0.0;
    let mut total = 0.0;

    for seed in seeds {
        let config = DiffusionConfig {
            seed: Some(*seed),
            ..base.clone()
        };
        let summary = DiffusionEngine::from_config(config)?.run()?;
        direct += summary.pct_direct;
        total += summary.pct_total;
    }

    let n = seeds.len().max(1) as f64;
    Ok((direct / n, total / n))
}

/// Run count and base seed from the command line (program name excluded)
fn parse_args(args: &[String]) -> Result<(usize, [u8; 32]), String> {
    let mut runs = 10usize;
    let mut base_seed = [7u8; 32];

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--runs" | "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("Missing value for {}", flag))?;
                if flag == "--runs" {
                    runs = value
                        .parse()
                        .map_err(|e| format!("Invalid run count: {}", e))?;
                } else {
                    base_seed = parse_seed_hex(value).map_err(|e| e.to_string())?;
                }
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok((runs, base_seed))
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()
        .unwrap();

    let args: Vec<String> = env::args().collect();
    let (runs, base_seed) = match parse_args(&args[1..]) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Usage: {} [--runs N] [--seed SEED_HEX]", args[0]);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let mut seed_rng = StdRng::from_seed(base_seed);
    let seeds: Vec<[u8; 32]> = (0..runs)
        .map(|_| {
            let mut seed = [0u8; 32];
            seed_rng.fill_bytes(&mut seed);
            seed
        })
        .collect();

    let base = DiffusionConfig::default();

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  REACH SWEEP                                           ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!(
        "Persons: {}  Peer rounds: {}  Runs per cell: {}\n",
        base.num_persons, base.rounds, runs
    );

    print!("{:>10}", "reach");
    for prob in CONVINCE_PROBS {
        print!(" {:>16}", format!("p={:.2}", prob));
    }
    println!();
    println!("{}", "-".repeat(10 + 17 * CONVINCE_PROBS.len()));

    for reach in REACH_FRACTIONS {
        print!("{:>9.0}%", reach * 100.0);
        for prob in CONVINCE_PROBS {
            let config = DiffusionConfig {
                influencer_reach_fraction: reach,
                influencer_convince_prob: prob,
                ..base.clone()
            };
            match run_cell(&config, &seeds) {
                Ok((direct, total)) => print!(" {:>7.2}% /{:>6.2}%", direct, total),
                Err(e) => {
                    error!("reach {} prob {}: {}", reach, prob, e);
                    process::exit(1);
                }
            }
        }
        println!();
    }

    println!("\nCells show mean direct % / mean total % of persons.");
    info!("sweep complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), (10, [7u8; 32]));
    }

    #[test]
    fn test_parse_args_values() {
        let (runs, seed) = parse_args(&args(&["--runs", "3", "--seed", "0102"])).unwrap();
        assert_eq!(runs, 3);
        assert_eq!(seed[0], 0x01);
        assert_eq!(seed[1], 0x02);
    }

    #[test]
    fn test_parse_args_trailing_flag_rejected() {
        assert!(parse_args(&args(&["--runs"])).is_err());
        assert!(parse_args(&args(&["--runs", "2", "--seed"])).is_err());
        assert!(parse_args(&args(&["--help"])).is_err());
        assert!(parse_args(&args(&["--runs", "many"])).is_err());
    }
}
