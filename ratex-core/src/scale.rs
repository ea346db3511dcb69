use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for one rating scale within a trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDescriptor {
    pub prompt: String,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub required: bool,
    pub name: String,
}

impl Default for ScaleDescriptor {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            min: 0,
            max: 100,
            step: 1,
            required: true,
            name: String::new(),
        }
    }
}

impl ScaleDescriptor {
    pub fn new(prompt: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            prompt: prompt.into(),
            min,
            max,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min >= self.max {
            return Err(ConfigError::InvertedRange {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
            });
        }
        if self.step < 1 {
            return Err(ConfigError::NonPositiveStep {
                name: self.name.clone(),
                step: self.step,
            });
        }
        Ok(())
    }

    /// Snap a raw position onto the min/max/step grid, exactly the way a
    /// range control quantizes pointer input.
    pub fn snap(&self, raw: f64) -> i64 {
        let clamped = raw.clamp(self.min as f64, self.max as f64);
        let steps = ((clamped - self.min as f64) / self.step as f64).round() as i64;
        (self.min + steps * self.step).min(self.max)
    }
}
