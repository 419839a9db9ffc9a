//! Run configuration
//!
//! Defaults are the campaign parameters the model was calibrated with:
//! 500 persons, 15% influencer reach, 20% convince probability, 10% / 20%
//! friend probabilities and two peer rounds.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::vs_error::{check_probability, SimError, SimResult};
use crate::vs_generator::DEFAULT_RADIUS;
use crate::vs_interface::{LabelSet, Position, INFLUENCER_POSITION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffusionConfig {
    /// Size of the generated population
    pub num_persons: usize,

    /// Connection radius of the random geometric graph
    pub connection_radius: f64,

    /// Fraction of all nodes (influencer included) wired to the influencer
    pub influencer_reach_fraction: f64,

    /// Per-neighbour conversion probability of the influencer
    pub influencer_convince_prob: f64,

    /// Conversion probability with exactly one buying neighbour
    pub friend_single_prob: f64,

    /// Conversion probability with more than two buying neighbours
    pub friend_multiple_prob: f64,

    /// Number of peer influence rounds
    pub rounds: u32,

    /// Number of buyer outreach passes after the peer rounds
    pub outreach_rounds: u32,

    /// Position of the influencer node
    pub influencer_position: Position,

    /// Random seed (None = generate random)
    pub seed: Option<[u8; 32]>,

    /// Labels used when printing buy states
    pub labels: LabelSet,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            num_persons: 500,
            connection_radius: DEFAULT_RADIUS,
            influencer_reach_fraction: 0.15,
            influencer_convince_prob: 0.2,
            friend_single_prob: 0.1,
            friend_multiple_prob: 0.2,
            rounds: 2,
            outreach_rounds: 0,
            influencer_position: INFLUENCER_POSITION,
            seed: None,
            labels: LabelSet::English,
        }
    }
}

impl DiffusionConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> SimResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SimError::config(format!("invalid configuration: {}", e)))
    }

    /// Check every parameter. Does not check the reach against the graph,
    /// that happens when the influencer is attached.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_persons == 0 {
            return Err(SimError::config("num_persons must be positive"));
        }
        if !self.connection_radius.is_finite() || self.connection_radius <= 0.0 {
            return Err(SimError::config(format!(
                "connection_radius must be positive, got {}",
                self.connection_radius
            )));
        }
        check_probability("influencer_reach_fraction", self.influencer_reach_fraction)?;
        check_probability("influencer_convince_prob", self.influencer_convince_prob)?;
        check_probability("friend_single_prob", self.friend_single_prob)?;
        check_probability("friend_multiple_prob", self.friend_multiple_prob)?;
        Ok(())
    }

    /// Get or generate seed
    pub fn resolve_seed(&self) -> [u8; 32] {
        self.seed.unwrap_or_else(|| {
            let mut temp_rng = StdRng::from_entropy();
            let mut seed = [0u8; 32];
            temp_rng.fill_bytes(&mut seed);
            seed
        })
    }
}

/// Parse a hex seed (optional `0x` prefix, up to 64 digits, zero padded on the right)
pub fn parse_seed_hex(hex: &str) -> SimResult<[u8; 32]> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() > 64 || hex.len() % 2 != 0 {
        return Err(SimError::config(format!(
            "seed must have an even number of hex digits, at most 64: {}",
            hex
        )));
    }

    let mut seed = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let byte_str = std::str::from_utf8(chunk)
            .map_err(|e| SimError::config(format!("invalid hex seed: {}", e)))?;
        seed[i] = u8::from_str_radix(byte_str, 16)
            .map_err(|e| SimError::config(format!("invalid hex seed: {}", e)))?;
    }
    Ok(seed)
}
