// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/baseline.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/baseline.yaml --seed 0x1234...

mod diffusion;

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use diffusion::{print_history, print_summary, LoggingEventSink};
use log::error;
use simple_logger::SimpleLogger;
use vs_rust::vs_config::parse_seed_hex;
use vs_rust::{DiffusionConfig, DiffusionEngine, SimError};

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Configuration overrides, missing keys keep their defaults
    #[serde(default)]
    config: DiffusionConfig,

    /// Print every conversion event
    #[serde(default)]
    log_events: bool,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
    hypothesis: Option<String>,
}

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/baseline.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/baseline.yaml --seed 0x123456...", args[0]);
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed
    let seed: Option<[u8; 32]> = if args.len() >= 4 && args[2] == "--seed" {
        match parse_seed_hex(&args[3]) {
            Ok(seed) => Some(seed),
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    } else {
        None
    };

    let result = if path.is_file() {
        run_scenario_file(path, seed)
    } else if path.is_dir() {
        run_scenario_directory(path, seed)
    } else {
        Err(SimError::config(format!("path does not exist: {}", path.display())))
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| SimError::config(format!("cannot read {}: {}", dir.display(), e)))?;

    // Find all .yaml files
    let mut scenarios: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    scenarios.sort();

    if scenarios.is_empty() {
        return Err(SimError::config(format!(
            "no .yaml files found in {}",
            dir.display()
        )));
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                  ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed)?;
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete!                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    Ok(())
}

fn load_scenario(path: &Path) -> Result<ScenarioFile, SimError> {
    let yaml_content = fs::read_to_string(path)
        .map_err(|e| SimError::config(format!("failed to read {}: {}", path.display(), e)))?;

    serde_yaml::from_str(&yaml_content)
        .map_err(|e| SimError::config(format!("failed to parse {}: {}", path.display(), e)))
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    println!("Loading scenario from: {}", path.display());
    let scenario = load_scenario(path)?;

    // Print scenario header
    println!("\n╔════════════════════════════════════════════════════════╗");
    match scenario.meta.name {
        Some(ref name) => println!("║  {}", name),
        None => println!(
            "║  Scenario: {}",
            path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed")
        ),
    }
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if let Some(ref hypothesis) = scenario.meta.hypothesis {
        println!("Hypothesis:");
        println!("  {}\n", hypothesis);
    }

    let mut config = scenario.config;
    if seed.is_some() {
        config.seed = seed;
    }

    println!("Configuration:");
    println!("  Persons: {}", config.num_persons);
    println!("  Connection radius: {}", config.connection_radius);
    println!("  Influencer reach: {:.0}%", config.influencer_reach_fraction * 100.0);
    println!("  Influencer convince prob: {}", config.influencer_convince_prob);
    println!(
        "  Friend probs: single={} multiple={}",
        config.friend_single_prob, config.friend_multiple_prob
    );
    println!("  Peer rounds: {}", config.rounds);
    println!("  Outreach passes: {}", config.outreach_rounds);
    println!("\nStarting simulation...\n");

    let labels = config.labels;
    let mut engine = DiffusionEngine::from_config(config)?
        .with_sink(LoggingEventSink::new(scenario.log_events));
    let summary = engine.run()?;

    print_history(engine.history());
    print_summary(&summary, engine.network(), labels, engine.seed_used());

    println!("\n✓ Scenario complete!\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_file_defaults() {
        let yaml = "
meta:
  name: Small town
config:
  num_persons: 150
  rounds: 1
";
        let scenario: ScenarioFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.meta.name.as_deref(), Some("Small town"));
        assert_eq!(scenario.config.num_persons, 150);
        assert_eq!(scenario.config.rounds, 1);
        assert_eq!(scenario.config.friend_single_prob, 0.1);
        assert!(!scenario.log_events);
    }

    #[test]
    fn test_bundled_scenarios_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        for entry in fs::read_dir(dir).unwrap().flatten() {
            let scenario = load_scenario(&entry.path()).unwrap();
            scenario.config.validate().unwrap();
        }
    }
}
