//! Aggregation of buyer counts

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::vs_interface::{Influence, Stage};
use crate::vs_network::Network;

/// Buyer counts by provenance. Percentages are relative to the configured
/// person count, excluding the influencer, and expressed in percent (0..=100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdoptionSummary {
    pub num_persons: usize,
    pub direct_buyers: usize,
    pub peer_buyers: usize,
    pub total_buyers: usize,
    pub pct_direct: f64,
    pub pct_peer: f64,
    pub pct_total: f64,
}

/// Count Person buyers by provenance. Pure; safe after any stage.
pub fn summarize(network: &Network) -> AdoptionSummary {
    let mut direct_buyers = 0;
    let mut peer_buyers = 0;
    let mut total_buyers = 0;

    for node in network.persons().filter(|n| n.is_buyer()) {
        total_buyers += 1;
        match node.influenced_by {
            Influence::Influencer => direct_buyers += 1,
            Influence::Peer => peer_buyers += 1,
            Influence::None => {}
        }
    }

    let num_persons = network.num_persons();
    let pct = |count: usize| {
        if num_persons == 0 {
            0.0
        } else {
            count as f64 * 100.0 / num_persons as f64
        }
    };

    AdoptionSummary {
        num_persons,
        direct_buyers,
        peer_buyers,
        total_buyers,
        pct_direct: pct(direct_buyers),
        pct_peer: pct(peer_buyers),
        pct_total: pct(total_buyers),
    }
}

/// Number of conversions stamped with each stage
pub fn conversions_by_stage(network: &Network) -> HashMap<Stage, usize> {
    let mut counts = HashMap::new();
    for stage in network.nodes().iter().filter_map(|n| n.converted_at) {
        *counts.entry(stage).or_insert(0) += 1;
    }
    counts
}

/// Summary taken right after a stage completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub converted: usize,
    pub summary: AdoptionSummary,
}

/// Ordered stage-by-stage progress of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageHistory {
    records: Vec<StageRecord>,
}

impl StageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StageRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&StageRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total buyers per stage as a fraction of the population
    pub fn buyer_fractions(&self) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.summary.pct_total / 100.0)
            .collect()
    }
}
