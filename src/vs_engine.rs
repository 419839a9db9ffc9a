//! Diffusion engine
//!
//! Owns one [`Network`] and drives it through the stage sequence:
//! attachment -> direct influence -> peer rounds -> outreach passes.
//! Each stage can also be run individually so callers can snapshot the
//! network in between; [`DiffusionEngine::run`] finishes whatever is left.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::vs_config::DiffusionConfig;
use crate::vs_error::{SimError, SimResult};
use crate::vs_generator::{GraphGenerator, RandomGeometricGenerator};
use crate::vs_influencer::{apply_direct_influence, attach_reach, reach_for_node_count};
use crate::vs_interface::{DiffusionEvent, EventSink, Influence, NodeId, NoOpSink, Stage};
use crate::vs_network::Network;
use crate::vs_peer::{apply_buyer_outreach, apply_peer_influence_round};
use crate::vs_random::UniformSource;
use crate::vs_stats::{summarize, AdoptionSummary, StageHistory, StageRecord};

pub struct DiffusionEngine<R: UniformSource, S: EventSink = NoOpSink> {
    config: DiffusionConfig,
    network: Network,
    rng: R,
    sink: S,
    seed_used: Option<[u8; 32]>,
    history: StageHistory,
    direct_done: bool,
}

impl DiffusionEngine<StdRng> {
    /// Engine over a random geometric graph, seeded from the config
    pub fn from_config(config: DiffusionConfig) -> SimResult<Self> {
        config.validate()?;
        let seed = config.resolve_seed();
        let mut generator = RandomGeometricGenerator::new(config.connection_radius)?;
        let mut engine = Self::new(config, &mut generator, StdRng::from_seed(seed))?;
        engine.seed_used = Some(seed);
        Ok(engine)
    }
}

impl<R: UniformSource> DiffusionEngine<R> {
    /// Generate the population with `generator`, drawing from `rng`
    pub fn new(
        config: DiffusionConfig,
        generator: &mut dyn GraphGenerator,
        mut rng: R,
    ) -> SimResult<Self> {
        config.validate()?;
        let network = Network::initialize(config.num_persons, generator, &mut rng)?;
        Self::from_network(config, network, rng)
    }

    /// Run over an existing network, e.g. a hand-built one
    pub fn from_network(config: DiffusionConfig, network: Network, rng: R) -> SimResult<Self> {
        config.validate()?;
        if network.num_persons() != config.num_persons {
            return Err(SimError::config(format!(
                "network has {} persons, configuration expects {}",
                network.num_persons(),
                config.num_persons
            )));
        }

        let mut engine = Self {
            config,
            network,
            rng,
            sink: NoOpSink,
            seed_used: None,
            history: StageHistory::new(),
            direct_done: false,
        };
        engine.record(Stage::Initial, 0);
        Ok(engine)
    }
}

impl<R: UniformSource, S: EventSink> DiffusionEngine<R, S> {
    /// Replace the event sink
    pub fn with_sink<T: EventSink>(self, sink: T) -> DiffusionEngine<R, T> {
        DiffusionEngine {
            config: self.config,
            network: self.network,
            rng: self.rng,
            sink,
            seed_used: self.seed_used,
            history: self.history,
            direct_done: self.direct_done,
        }
    }

    pub fn config(&self) -> &DiffusionConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn history(&self) -> &StageHistory {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn seed_used(&self) -> Option<[u8; 32]> {
        self.seed_used
    }

    pub fn summary(&self) -> AdoptionSummary {
        summarize(&self.network)
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Add the influencer and wire it to its sampled reach
    pub fn attach_influencer(&mut self) -> SimResult<NodeId> {
        // reject an oversized reach before the influencer node is added
        let available = self.network.node_count();
        let reach = reach_for_node_count(available + 1, self.config.influencer_reach_fraction);
        if reach > available {
            return Err(SimError::config(format!(
                "reach of {} nodes exceeds the {} available persons",
                reach, available
            )));
        }

        let influencer = self
            .network
            .attach_influencer(self.config.influencer_position)?;
        let targets = attach_reach(
            &mut self.network,
            influencer,
            self.config.influencer_reach_fraction,
            &mut self.rng,
        )?;

        self.sink.log(
            Stage::Attachment,
            DiffusionEvent::InfluencerAttached {
                influencer,
                reach: targets.len(),
            },
        );
        self.record(Stage::Attachment, 0);
        Ok(influencer)
    }

    fn require_influencer(&self) -> SimResult<NodeId> {
        self.network
            .influencer()
            .ok_or_else(|| SimError::config("influencer must be attached first"))
    }

    pub fn direct_influence(&mut self) -> SimResult<Vec<NodeId>> {
        let influencer = self.require_influencer()?;
        if self.direct_done {
            return Err(SimError::config("direct influence already applied"));
        }

        let converted = apply_direct_influence(
            &mut self.network,
            influencer,
            self.config.influencer_convince_prob,
            &mut self.rng,
        )?;
        self.direct_done = true;
        self.finish_stage(Stage::Direct, &converted, Influence::Influencer);
        Ok(converted)
    }

    pub fn peer_round(&mut self) -> SimResult<Vec<NodeId>> {
        if !self.direct_done {
            return Err(SimError::config("peer rounds run after direct influence"));
        }

        let converted = apply_peer_influence_round(
            &mut self.network,
            self.config.friend_single_prob,
            self.config.friend_multiple_prob,
            &mut self.rng,
        )?;
        let stage = Stage::PeerRound(self.network.peer_rounds_run());
        self.finish_stage(stage, &converted, Influence::Peer);
        Ok(converted)
    }

    pub fn outreach_pass(&mut self) -> SimResult<Vec<NodeId>> {
        if !self.direct_done {
            return Err(SimError::config("outreach runs after direct influence"));
        }

        let converted = apply_buyer_outreach(
            &mut self.network,
            self.config.friend_single_prob,
            &mut self.rng,
        )?;
        let stage = Stage::Outreach(self.network.outreach_passes_run());
        self.finish_stage(stage, &converted, Influence::Peer);
        Ok(converted)
    }

    /// Run every stage not yet run and return the final summary
    pub fn run(&mut self) -> SimResult<AdoptionSummary> {
        info!(
            "running diffusion: {} persons, {} peer rounds, {} outreach passes",
            self.config.num_persons, self.config.rounds, self.config.outreach_rounds
        );

        if self.network.influencer().is_none() {
            self.attach_influencer()?;
        }
        if !self.direct_done {
            self.direct_influence()?;
        }
        while self.network.peer_rounds_run() < self.config.rounds {
            self.peer_round()?;
        }
        while self.network.outreach_passes_run() < self.config.outreach_rounds {
            self.outreach_pass()?;
        }

        let summary = self.summary();
        info!(
            "diffusion complete: {} buyers ({} direct, {} peer), {:.2}%",
            summary.total_buyers, summary.direct_buyers, summary.peer_buyers, summary.pct_total
        );
        Ok(summary)
    }

    fn finish_stage(&mut self, stage: Stage, converted: &[NodeId], influence: Influence) {
        for &node in converted {
            self.sink
                .log(stage, DiffusionEvent::Converted { node, influence });
        }
        let summary = self.record(stage, converted.len());
        self.sink.log(
            stage,
            DiffusionEvent::StageCompleted {
                conversions: converted.len(),
                total_buyers: summary.total_buyers,
            },
        );
    }

    fn record(&mut self, stage: Stage, converted: usize) -> AdoptionSummary {
        let summary = summarize(&self.network);
        debug!(
            "stage {}: +{} buyers, {} total",
            stage, converted, summary.total_buyers
        );
        self.history.push(StageRecord {
            stage,
            converted,
            summary,
        });
        summary
    }
}
