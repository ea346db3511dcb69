use serde::{Deserialize, Serialize};

use crate::policy::DefaultValuePolicy;
use crate::scale::ScaleDescriptor;

/// Trial lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialState {
    Idle,
    Rendering,
    AwaitingResponse,
    Finalizing,
    Done,
}

/// Currently displayed value of one rating scale. Created at render time,
/// mutated only by real or simulated interaction, discarded at finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveScaleState {
    pub value: i64,
    pub touched: bool,
}

impl LiveScaleState {
    pub fn initial(descriptor: &ScaleDescriptor, default_value: DefaultValuePolicy) -> Self {
        Self {
            value: default_value(descriptor),
            touched: false,
        }
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
        self.touched = true;
    }
}
