use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use ratex_core::{ResponseRecord, TrialConfig, TrialSurface};
use ratex_timing::ManualTimer;
use ratex_trial::{ControllerOptions, TrialController, TrialEvent};

use crate::error::SimError;
use crate::latency::{BASE_LATENCY_MS, ExGaussian};

/// Host-supplied partial overrides, merged over the synthetic defaults.
/// Values are keyed by descriptor name; with duplicate names the last merge
/// wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationOptions {
    pub response: BTreeMap<String, i64>,
    pub rt: Option<u64>,
}

impl SimulationOptions {
    pub fn with_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.response.insert(name.into(), value);
        self
    }

    pub fn with_rt(mut self, rt: u64) -> Self {
        self.rt = Some(rt);
        self
    }
}

/// Synthetic trial data after default generation and override merging.
/// Internal shape only; both simulation modes emit the canonical positional
/// `ResponseRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationData {
    pub response: BTreeMap<String, i64>,
    pub rt: u64,
}

impl SimulationData {
    /// Resolve the name-keyed values into the positional record, in
    /// descriptor declaration order.
    pub fn into_record(self, config: &TrialConfig) -> Result<ResponseRecord, SimError> {
        let mut question_numbers = Vec::with_capacity(config.questions.len());
        let mut response_values = Vec::with_capacity(config.questions.len());
        for (i, question) in config.questions.iter().enumerate() {
            let value = self
                .response
                .get(&question.name)
                .copied()
                .ok_or_else(|| SimError::UnknownOverride(question.name.clone()))?;
            question_numbers.push(i + 1);
            response_values.push(value);
        }
        Ok(ResponseRecord {
            elapsed_response_time: self.rt,
            question_numbers,
            response_values,
            stimulus_image: config.stimulus_image.clone(),
            stimulus_word: config.stimulus_word.clone(),
        })
    }
}

/// Host consistency checker: every merged value must sit inside its
/// descriptor's declared range. Hard failure, no clamping.
pub fn ensure_consistency(config: &TrialConfig, data: &SimulationData) -> Result<(), SimError> {
    for question in &config.questions {
        if let Some(&value) = data.response.get(&question.name) {
            if value < question.min || value > question.max {
                return Err(SimError::OverrideOutOfRange {
                    name: question.name.clone(),
                    value,
                    min: question.min,
                    max: question.max,
                });
            }
        }
    }
    Ok(())
}

/// Produces synthetic response records, either headless or by driving the
/// real controller through simulated interaction.
pub struct Simulator<R: Rng> {
    rng: R,
    latency: ExGaussian,
}

impl<R: Rng> Simulator<R> {
    pub fn new(rng: R) -> Result<Self, SimError> {
        Ok(Self {
            rng,
            latency: ExGaussian::default_latency()?,
        })
    }

    pub fn draw_uniform_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Draw per-descriptor defaults, merge host overrides, verify internal
    /// consistency. Overrides naming scales the config does not declare are
    /// rejected rather than silently carried.
    pub fn create_simulation_data(
        &mut self,
        config: &TrialConfig,
        options: &SimulationOptions,
    ) -> Result<SimulationData, SimError> {
        config.validate()?;

        let mut response = BTreeMap::new();
        let mut rt = BASE_LATENCY_MS;
        for question in &config.questions {
            let value = self.draw_uniform_int(question.min, question.max);
            response.insert(question.name.clone(), value);
            rt += self.latency.sample(&mut self.rng);
        }

        for (name, &value) in &options.response {
            if !config.questions.iter().any(|q| q.name == *name) {
                return Err(SimError::UnknownOverride(name.clone()));
            }
            response.insert(name.clone(), value);
        }

        let data = SimulationData {
            response,
            rt: options.rt.unwrap_or_else(|| rt.round() as u64),
        };
        ensure_consistency(config, &data)?;
        Ok(data)
    }

    /// Data-only mode: no rendering, no state-machine traversal. The record
    /// is produced directly and handed down the same completion path.
    pub fn simulate_data_only(
        &mut self,
        config: &TrialConfig,
        options: &SimulationOptions,
    ) -> Result<ResponseRecord, SimError> {
        let data = self.create_simulation_data(config, options)?;
        data.into_record(config)
    }

    /// Visual mode: run the real controller end-to-end. Every scale gets the
    /// same ValueChanged event a real drag would produce, so the collector's
    /// live-readout path is exercised identically; the clock is advanced by
    /// the synthetic rt before the programmatic submission.
    pub fn simulate_visual<S: TrialSurface>(
        &mut self,
        config: &TrialConfig,
        options: &SimulationOptions,
        controller_options: ControllerOptions,
        surface: &mut S,
    ) -> Result<ResponseRecord, SimError> {
        let data = self.create_simulation_data(config, options)?;

        let timer = ManualTimer::new();
        let mut controller =
            TrialController::begin(config.clone(), controller_options, timer.clone())?;
        controller.handle_event(TrialEvent::SurfaceReady, surface)?;

        for (index, question) in config.questions.iter().enumerate() {
            let value = data
                .response
                .get(&question.name)
                .copied()
                .ok_or_else(|| SimError::UnknownOverride(question.name.clone()))?;
            controller.handle_event(TrialEvent::ValueChanged { index, value }, surface)?;
        }

        timer.advance(Duration::from_millis(data.rt));
        controller
            .handle_event(TrialEvent::SubmitPressed, surface)?
            .ok_or(SimError::NotFinalized)
    }
}
