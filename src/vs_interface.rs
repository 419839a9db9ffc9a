// Shared types for the diffusion simulation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Node identity. Person nodes occupy `0..num_persons`, the influencer is appended after them.
pub type NodeId = usize;

/// 2D coordinate in generator space (unit square for geometric graphs)
pub type Position = (f64, f64);

/// Default out-of-band position of the influencer node (above the unit square)
pub const INFLUENCER_POSITION: Position = (0.5, 1.1);

/// What a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Person,
    Influencer,
}

/// Diffusion state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuyState {
    NoBuyer,
    Buyer,
}

impl BuyState {
    pub fn is_buyer(self) -> bool {
        matches!(self, BuyState::Buyer)
    }
}

/// Provenance of a conversion. Set once, at the moment of conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Influence {
    None,
    Influencer,
    Peer,
}

/// Pipeline stage. Used to stamp conversions and to label history records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Initial,
    Attachment,
    Direct,
    /// Peer influence round, 1-based
    PeerRound(u32),
    /// Buyer outreach pass, 1-based
    Outreach(u32),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Initial => write!(f, "initial"),
            Stage::Attachment => write!(f, "attachment"),
            Stage::Direct => write!(f, "direct"),
            Stage::PeerRound(n) => write!(f, "peer-round-{}", n),
            Stage::Outreach(n) => write!(f, "outreach-{}", n),
        }
    }
}

/// Display labels for the two buy states (`Kauf` / `Nicht-Kauf` in German)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelSet {
    #[default]
    English,
    German,
}

impl LabelSet {
    pub fn label(self, state: BuyState) -> &'static str {
        match (self, state) {
            (LabelSet::English, BuyState::Buyer) => "Buyer",
            (LabelSet::English, BuyState::NoBuyer) => "No-Buyer",
            (LabelSet::German, BuyState::Buyer) => "Kauf",
            (LabelSet::German, BuyState::NoBuyer) => "Nicht-Kauf",
        }
    }
}

/// Events emitted by the engine as the simulation progresses
#[derive(Debug, Clone, PartialEq)]
pub enum DiffusionEvent {
    /// Influencer node added to the network
    InfluencerAttached { influencer: NodeId, reach: usize },
    /// Node converted to buyer
    Converted {
        node: NodeId,
        influence: Influence,
    },
    /// Stage finished
    StageCompleted {
        conversions: usize,
        total_buyers: usize,
    },
}

/// Trait for consuming events from the diffusion engine
pub trait EventSink {
    fn log(&mut self, stage: Stage, event: DiffusionEvent);
}

/// No-op event sink
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _stage: Stage, _event: DiffusionEvent) {}
}

/// Event sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<(Stage, DiffusionEvent)>,
}

impl EventSink for CollectingSink {
    fn log(&mut self, stage: Stage, event: DiffusionEvent) {
        self.events.push((stage, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::Initial < Stage::Direct);
        assert!(Stage::Direct < Stage::PeerRound(1));
        assert!(Stage::PeerRound(1) < Stage::PeerRound(2));
        assert!(Stage::PeerRound(2) < Stage::Outreach(1));
    }

    #[test]
    fn test_label_sets() {
        assert_eq!(LabelSet::English.label(BuyState::Buyer), "Buyer");
        assert_eq!(LabelSet::English.label(BuyState::NoBuyer), "No-Buyer");
        assert_eq!(LabelSet::German.label(BuyState::Buyer), "Kauf");
        assert_eq!(LabelSet::German.label(BuyState::NoBuyer), "Nicht-Kauf");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::PeerRound(2).to_string(), "peer-round-2");
        assert_eq!(Stage::Outreach(1).to_string(), "outreach-1");
    }
}
