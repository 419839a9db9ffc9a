//! Event logging for simulator

use log::info;
use vs_rust::{DiffusionEvent, EventSink, Influence, Stage};

/// Logging event sink that outputs events through the `log` facade
pub struct LoggingEventSink {
    enabled: bool,
}

impl LoggingEventSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl EventSink for LoggingEventSink {
    fn log(&mut self, stage: Stage, event: DiffusionEvent) {
        if !self.enabled {
            return;
        }

        match event {
            DiffusionEvent::InfluencerAttached { influencer, reach } => {
                info!(
                    "{:>12} attach: influencer:{} reach:{}",
                    stage.to_string(),
                    influencer,
                    reach
                );
            }
            DiffusionEvent::Converted { node, influence } => {
                let by = match influence {
                    Influence::Influencer => "influencer",
                    Influence::Peer => "peer",
                    Influence::None => "none",
                };
                info!("{:>12} convert: n:{} by:{}", stage.to_string(), node, by);
            }
            DiffusionEvent::StageCompleted {
                conversions,
                total_buyers,
            } => {
                info!(
                    "{:>12} done: +{} total:{}",
                    stage.to_string(),
                    conversions,
                    total_buyers
                );
            }
        }
    }
}
