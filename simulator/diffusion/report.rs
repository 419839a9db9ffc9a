//! Console reports for simulation results

use vs_rust::vs_stats::conversions_by_stage;
use vs_rust::{AdoptionSummary, BuyState, LabelSet, Network, StageHistory};

/// Print the per-stage progress table
pub fn print_history(history: &StageHistory) {
    println!("Stage History:");
    println!(
        "  {:<14} {:>8} {:>8} {:>8} {:>8} {:>9}",
        "Stage", "Added", "Direct", "Peer", "Total", "Buyers %"
    );
    for record in history.records() {
        println!(
            "  {:<14} {:>8} {:>8} {:>8} {:>8} {:>8.2}%",
            record.stage.to_string(),
            record.converted,
            record.summary.direct_buyers,
            record.summary.peer_buyers,
            record.summary.total_buyers,
            record.summary.pct_total
        );
    }

    let fractions: Vec<String> = history
        .buyer_fractions()
        .iter()
        .map(|f| format!("{:.3}", f))
        .collect();
    println!("  Fractions: [{}]", fractions.join(", "));
    println!();
}

/// Print a summary of the simulation results
pub fn print_summary(
    summary: &AdoptionSummary,
    network: &Network,
    labels: LabelSet,
    seed: Option<[u8; 32]>,
) {
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║        Viral Spread Simulation Results                 ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    println!("Network:");
    if let Some(seed) = seed {
        println!("  Seed: 0x{}", seed.iter().map(|b| format!("{:02x}", b)).collect::<String>());
    }
    println!("  Persons: {}", network.num_persons());
    println!("  Person edges: {}", network.person_edges().count());
    println!("  Influencer edges: {}", network.influencer_edges().len());
    println!();

    let buyers = labels.label(BuyState::Buyer);
    let non_buyers = labels.label(BuyState::NoBuyer);
    println!("Adoption:");
    println!(
        "  '{}' via influencer: {} ({:.2}%)",
        buyers, summary.direct_buyers, summary.pct_direct
    );
    println!(
        "  '{}' via peers:      {} ({:.2}%)",
        buyers, summary.peer_buyers, summary.pct_peer
    );
    println!(
        "  '{}' total:          {} ({:.2}%)",
        buyers, summary.total_buyers, summary.pct_total
    );
    println!(
        "  '{}':                {}",
        non_buyers,
        summary.num_persons - summary.total_buyers
    );

    let mut by_stage: Vec<_> = conversions_by_stage(network).into_iter().collect();
    by_stage.sort();
    if !by_stage.is_empty() {
        println!("  Conversions by stage:");
        for (stage, count) in by_stage {
            println!("    {:<14} {}", stage.to_string(), count);
        }
    }
    println!();
}
