use thiserror::Error;

use crate::state::TrialState;

/// Problems detected in a trial configuration before anything is drawn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("stimulus_image must be set")]
    MissingStimulusImage,

    #[error("stimulus_word must be set")]
    MissingStimulusWord,

    #[error("scale `{name}`: min {min} must be below max {max}")]
    InvertedRange { name: String, min: i64, max: i64 },

    #[error("scale `{name}`: step {step} must be positive")]
    NonPositiveStep { name: String, step: i64 },
}

/// Runtime failures of the trial state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrialError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event `{event}` not accepted in state {state:?}")]
    InvalidTransition {
        state: TrialState,
        event: &'static str,
    },

    #[error("no scale at index {0}")]
    NoSuchScale(usize),

    #[error("required scales not answered: {0:?}")]
    RequiredUnanswered(Vec<String>),
}
