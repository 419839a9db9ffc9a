//! Error taxonomy for the diffusion engine
//!
//! Configuration errors are raised at stage entry, before any mutation.
//! Invariant violations abort the run.

use thiserror::Error;

use crate::vs_interface::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Invalid parameter or unsatisfiable request
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal consistency broken (overwritten provenance, dangling edge, ...)
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Node id outside the network
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

impl SimError {
    pub fn config(msg: impl Into<String>) -> Self {
        SimError::Configuration(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        SimError::InvariantViolation(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, SimError::Configuration(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimError::InvariantViolation(_) | SimError::UnknownNode(_))
    }
}

pub type SimResult<T> = Result<T, SimError>;

/// Check that `value` is a probability in [0, 1]
pub fn check_probability(name: &str, value: f64) -> SimResult<()> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(SimError::config(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}
