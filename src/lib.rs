//! # vsRust - Viral Spread Simulation
//!
//! Simulates product adoption spreading over a social network. A synthetic
//! population is generated as a graph, one external influencer node is wired
//! to a random share of it, and the "buyer" state then propagates in stages:
//! first through direct influencer exposure, then through peer pressure over
//! one or more synchronous rounds. Every conversion records who caused it.
//!
//! ## Core Components
//!
//! - **Network**: node attributes and adjacency, the only mutable state of a run
//! - **Influencer stages**: reach sampling and direct conversion
//! - **Peer stages**: neighbour-count tiers and buyer outreach
//! - **Aggregator**: buyer counts by provenance
//! - **DiffusionEngine**: runs the stages in order and keeps a per-stage history
//!
//! ## Usage
//!
//! ```no_run
//! use vs_rust::{DiffusionConfig, DiffusionEngine};
//!
//! let config = DiffusionConfig {
//!     num_persons: 500,
//!     seed: Some([42u8; 32]),
//!     ..Default::default()
//! };
//!
//! let mut engine = DiffusionEngine::from_config(config).unwrap();
//! let summary = engine.run().unwrap();
//! println!("{:.2}% bought", summary.pct_total);
//! ```
//!
//! Stages can also be driven one at a time (`attach_influencer`,
//! `direct_influence`, `peer_round`, `outreach_pass`) to inspect
//! `engine.network()` in between.

pub mod vs_config;
pub mod vs_engine;
pub mod vs_error;
pub mod vs_generator;
pub mod vs_influencer;
pub mod vs_interface;
pub mod vs_network;
pub mod vs_peer;
pub mod vs_random;
pub mod vs_stats;

// Re-export commonly used types
pub use vs_config::DiffusionConfig;
pub use vs_engine::DiffusionEngine;
pub use vs_error::{SimError, SimResult};
pub use vs_generator::{
    EdgeListGenerator, GeneratedGraph, GraphGenerator, RandomGeometricGenerator, RingGenerator,
};
pub use vs_interface::{
    BuyState, DiffusionEvent, EventSink, Influence, LabelSet, NoOpSink, NodeId, NodeKind,
    Position, Stage,
};
pub use vs_network::{Network, NetworkSnapshot, Node};
pub use vs_random::{ScriptedSource, UniformSource};
pub use vs_stats::{summarize, AdoptionSummary, StageHistory, StageRecord};
