use ratex_core::{ConfigError, TrialError};
use thiserror::Error;

/// Failures of the synthetic-response path. Out-of-range overrides are hard
/// errors at finalize time, never clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trial(#[from] TrialError),

    #[error("override names unknown scale `{0}`")]
    UnknownOverride(String),

    #[error("override {value} for scale `{name}` outside [{min}, {max}]")]
    OverrideOutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("bad latency distribution parameters: {0}")]
    BadDistribution(String),

    #[error("trial did not finalize")]
    NotFinalized,
}
