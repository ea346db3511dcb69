use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scale::ScaleDescriptor;

/// Everything the host supplies for one trial. Immutable once the trial
/// starts. Visual parameters (font size string, pixel sizes) pass through
/// verbatim; asset resolution is the host's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    pub stimulus_image: String,
    pub stimulus_word: String,
    pub stimulus_font_size: String,
    pub image_preamble: Option<String>,
    pub image_width: u32,
    pub scale_height: u32,
    pub leftmost_label: String,
    pub rightmost_label: String,
    pub button_label: String,
    pub questions: Vec<ScaleDescriptor>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            stimulus_image: String::new(),
            stimulus_word: String::new(),
            stimulus_font_size: "35px".into(),
            image_preamble: None,
            image_width: 700,
            scale_height: 150,
            leftmost_label: String::new(),
            rightmost_label: String::new(),
            button_label: "Submit response".into(),
            questions: Vec::new(),
        }
    }
}

impl TrialConfig {
    /// Fail-fast check, run before any surface mutation. An empty questions
    /// vec is legal (zero scale blocks, empty record on submit); missing
    /// stimulus fields and bad per-scale ranges are not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stimulus_image.is_empty() {
            return Err(ConfigError::MissingStimulusImage);
        }
        if self.stimulus_word.is_empty() {
            return Err(ConfigError::MissingStimulusWord);
        }
        for question in &self.questions {
            question.validate()?;
        }
        Ok(())
    }
}
