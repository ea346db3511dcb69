use ratex_core::{
    ResponseRecord, TimingPolicy, TrialConfig, TrialError, TrialState, TrialSurface,
    violated_required,
};
use ratex_timing::{Timer, to_whole_millis};

use crate::collector::ResponseCollector;
use crate::config::ControllerOptions;

/// Events a UI binding layer feeds into the controller. `ValueChanged`
/// carries whatever the range control produced after its own min/max/step
/// quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEvent {
    SurfaceReady,
    ValueChanged { index: usize, value: i64 },
    SubmitPressed,
}

impl TrialEvent {
    fn name(&self) -> &'static str {
        match self {
            TrialEvent::SurfaceReady => "SurfaceReady",
            TrialEvent::ValueChanged { .. } => "ValueChanged",
            TrialEvent::SubmitPressed => "SubmitPressed",
        }
    }
}

/// One-shot trial state machine: Idle → Rendering → AwaitingResponse →
/// Finalizing → Done. There is no timeout out of AwaitingResponse and no
/// cancellation; the only way forward is a submission event.
pub struct TrialController<T: Timer> {
    config: TrialConfig,
    options: ControllerOptions,
    timer: T,
    state: TrialState,
    collector: ResponseCollector,
    start: Option<T::Timestamp>,
}

impl<T: Timer> TrialController<T> {
    /// Idle → Rendering. Validates the configuration before any surface
    /// mutation; a malformed config fails the trial-start call itself.
    pub fn begin(
        config: TrialConfig,
        options: ControllerOptions,
        timer: T,
    ) -> Result<Self, TrialError> {
        config.validate()?;

        let collector = ResponseCollector::new(&config.questions, options.default_value);
        let start = match options.timing {
            TimingPolicy::ControllerStart => Some(timer.now()),
            TimingPolicy::PaintComplete => None,
        };

        Ok(Self {
            config,
            options,
            timer,
            state: TrialState::Rendering,
            collector,
            start,
        })
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    pub fn collector(&self) -> &ResponseCollector {
        &self.collector
    }

    /// Feed one event through the state machine. Returns the finalized
    /// record exactly once, on the submission that reaches Done.
    pub fn handle_event<S: TrialSurface>(
        &mut self,
        event: TrialEvent,
        surface: &mut S,
    ) -> Result<Option<ResponseRecord>, TrialError> {
        match (self.state, event) {
            // Rendering → AwaitingResponse: surface is fully built.
            (TrialState::Rendering, TrialEvent::SurfaceReady) => {
                if self.options.timing == TimingPolicy::PaintComplete {
                    self.start = Some(self.timer.now());
                }
                for index in 0..self.collector.len() {
                    if let Some(value) = self.collector.value(index) {
                        surface.set_thumb(index, value);
                        surface.set_readout(index, value);
                    }
                }
                self.state = TrialState::AwaitingResponse;
                Ok(None)
            }

            // Live value reflection while awaiting the submission.
            (TrialState::AwaitingResponse, TrialEvent::ValueChanged { index, value }) => {
                let stored = self.collector.value_changed(index, value)?;
                surface.set_thumb(index, stored);
                surface.set_readout(index, stored);
                Ok(None)
            }

            // AwaitingResponse → Finalizing → Done.
            (TrialState::AwaitingResponse, TrialEvent::SubmitPressed) => {
                if self.options.enforce_required {
                    let missing =
                        violated_required(&self.config.questions, self.collector.live());
                    if !missing.is_empty() {
                        return Err(TrialError::RequiredUnanswered(missing));
                    }
                }
                self.state = TrialState::Finalizing;
                let record = self.finalize(surface);
                self.state = TrialState::Done;
                Ok(Some(record))
            }

            (state, event) => Err(TrialError::InvalidTransition {
                state,
                event: event.name(),
            }),
        }
    }

    fn finalize<S: TrialSurface>(&mut self, surface: &mut S) -> ResponseRecord {
        let elapsed_response_time = self
            .start
            .map_or(0, |start| to_whole_millis(self.timer.elapsed(start)));
        let (question_numbers, response_values) = self.collector.assemble();

        let record = ResponseRecord {
            elapsed_response_time,
            question_numbers,
            response_values,
            stimulus_image: self.config.stimulus_image.clone(),
            stimulus_word: self.config.stimulus_word.clone(),
        };

        // Clearing drops the rendered elements and with them every
        // interaction binding attached during Rendering.
        surface.clear();

        if self.options.echo_record {
            if let Ok(json) = serde_json::to_string(&record) {
                println!("trial data: {json}");
            }
        }

        record
    }
}

/// Host entry contract: render first, then hand the surface here. Walks the
/// controller into AwaitingResponse and fires `on_ready` after rendering
/// completes (before the response clock is guaranteed meaningful).
pub fn begin_trial<T, S, F>(
    surface: &mut S,
    config: TrialConfig,
    options: ControllerOptions,
    timer: T,
    on_ready: Option<F>,
) -> Result<TrialController<T>, TrialError>
where
    T: Timer,
    S: TrialSurface,
    F: FnOnce(),
{
    let mut controller = TrialController::begin(config, options, timer)?;
    controller.handle_event(TrialEvent::SurfaceReady, surface)?;
    if let Some(on_ready) = on_ready {
        on_ready();
    }
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratex_core::{ConfigError, NullSurface, ScaleDescriptor, TimingPolicy};
    use ratex_timing::ManualTimer;
    use std::time::Duration;

    fn config(questions: Vec<ScaleDescriptor>) -> TrialConfig {
        TrialConfig {
            stimulus_image: "img/cat.png".into(),
            stimulus_word: "calm".into(),
            questions,
            ..TrialConfig::default()
        }
    }

    fn quiet() -> ControllerOptions {
        ControllerOptions {
            echo_record: false,
            ..ControllerOptions::default()
        }
    }

    /// Surface double that records every mutation the controller makes.
    #[derive(Default)]
    struct RecordingSurface {
        readouts: Vec<(usize, i64)>,
        thumbs: Vec<(usize, i64)>,
        cleared: bool,
    }

    impl TrialSurface for RecordingSurface {
        fn set_thumb(&mut self, index: usize, value: i64) {
            self.thumbs.push((index, value));
        }
        fn set_readout(&mut self, index: usize, value: i64) {
            self.readouts.push((index, value));
        }
        fn clear(&mut self) {
            self.cleared = true;
        }
    }

    #[test]
    fn malformed_config_fails_before_any_surface_mutation() {
        let mut config = config(vec![]);
        config.stimulus_word.clear();
        let result = TrialController::begin(config, quiet(), ManualTimer::new());
        assert!(matches!(
            result.err(),
            Some(TrialError::Config(ConfigError::MissingStimulusWord))
        ));
    }

    #[test]
    fn full_lifecycle_produces_positional_record() {
        let questions = vec![
            ScaleDescriptor::new("a", 0, 100),
            ScaleDescriptor::new("b", 0, 10),
            ScaleDescriptor::new("c", -5, 5),
        ];
        let timer = ManualTimer::new();
        let mut surface = RecordingSurface::default();
        let mut controller =
            TrialController::begin(config(questions), quiet(), timer.clone()).unwrap();
        assert_eq!(controller.state(), TrialState::Rendering);

        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        assert_eq!(controller.state(), TrialState::AwaitingResponse);

        controller
            .handle_event(TrialEvent::ValueChanged { index: 0, value: 42 }, &mut surface)
            .unwrap();
        timer.advance(Duration::from_millis(777));

        let record = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap()
            .expect("record on submission");

        assert_eq!(controller.state(), TrialState::Done);
        assert_eq!(record.question_numbers, vec![1, 2, 3]);
        assert_eq!(record.response_values, vec![42, 50, 50]);
        assert_eq!(record.elapsed_response_time, 777);
        assert_eq!(record.stimulus_image, "img/cat.png");
        assert_eq!(record.stimulus_word, "calm");
        assert!(record.is_aligned());
        assert!(surface.cleared);
    }

    #[test]
    fn default_fifty_is_not_clamped_to_narrow_ranges() {
        // {min:0, max:10} still starts at 50: the documented quirk.
        let questions = vec![ScaleDescriptor::new("narrow", 0, 10)];
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(questions), quiet(), ManualTimer::new()).unwrap();
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        let record = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap()
            .unwrap();
        assert_eq!(record.response_values, vec![50]);
    }

    #[test]
    fn readout_mirrors_every_successive_change() {
        let questions = vec![ScaleDescriptor::new("a", 0, 100)];
        let mut surface = RecordingSurface::default();
        let mut controller =
            TrialController::begin(config(questions), quiet(), ManualTimer::new()).unwrap();
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        for value in [10, 95, 3] {
            controller
                .handle_event(TrialEvent::ValueChanged { index: 0, value }, &mut surface)
                .unwrap();
        }
        assert_eq!(
            surface.readouts,
            vec![(0, 50), (0, 10), (0, 95), (0, 3)]
        );
    }

    #[test]
    fn empty_questions_submit_yields_empty_record() {
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(vec![]), quiet(), ManualTimer::new()).unwrap();
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        let record = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap()
            .unwrap();
        assert!(record.question_numbers.is_empty());
        assert!(record.response_values.is_empty());
    }

    #[test]
    fn submission_is_the_only_way_out_of_awaiting_response() {
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(vec![]), quiet(), ManualTimer::new()).unwrap();
        // Submit before the surface is ready is rejected.
        let err = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap_err();
        assert!(matches!(
            err,
            TrialError::InvalidTransition {
                state: TrialState::Rendering,
                ..
            }
        ));
    }

    #[test]
    fn controller_is_one_shot() {
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(vec![]), quiet(), ManualTimer::new()).unwrap();
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap();
        assert!(
            controller
                .handle_event(TrialEvent::SubmitPressed, &mut surface)
                .is_err()
        );
    }

    #[test]
    fn paint_complete_policy_starts_the_clock_at_surface_ready() {
        let timer = ManualTimer::new();
        let options = ControllerOptions {
            timing: TimingPolicy::PaintComplete,
            ..quiet()
        };
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(vec![]), options, timer.clone()).unwrap();

        // Time spent rendering does not count under PaintComplete.
        timer.advance(Duration::from_millis(300));
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        timer.advance(Duration::from_millis(450));

        let record = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap()
            .unwrap();
        assert_eq!(record.elapsed_response_time, 450);
    }

    #[test]
    fn controller_start_policy_counts_render_time() {
        let timer = ManualTimer::new();
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(vec![]), quiet(), timer.clone()).unwrap();
        timer.advance(Duration::from_millis(300));
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();
        timer.advance(Duration::from_millis(450));
        let record = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap()
            .unwrap();
        assert_eq!(record.elapsed_response_time, 750);
    }

    #[test]
    fn required_gate_blocks_until_touched_when_enabled() {
        let questions = vec![ScaleDescriptor {
            name: "mood".into(),
            ..ScaleDescriptor::new("a", 0, 100)
        }];
        let options = ControllerOptions {
            enforce_required: true,
            ..quiet()
        };
        let mut surface = NullSurface;
        let mut controller =
            TrialController::begin(config(questions), options, ManualTimer::new()).unwrap();
        controller
            .handle_event(TrialEvent::SurfaceReady, &mut surface)
            .unwrap();

        let err = controller
            .handle_event(TrialEvent::SubmitPressed, &mut surface)
            .unwrap_err();
        assert_eq!(err, TrialError::RequiredUnanswered(vec!["mood".into()]));
        // Still awaiting; touching the scale unblocks submission.
        assert_eq!(controller.state(), TrialState::AwaitingResponse);
        controller
            .handle_event(TrialEvent::ValueChanged { index: 0, value: 60 }, &mut surface)
            .unwrap();
        assert!(
            controller
                .handle_event(TrialEvent::SubmitPressed, &mut surface)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn begin_trial_fires_on_ready_after_rendering() {
        let mut surface = NullSurface;
        let mut fired = false;
        let controller = begin_trial(
            &mut surface,
            config(vec![]),
            quiet(),
            ManualTimer::new(),
            Some(|| fired = true),
        )
        .unwrap();
        assert!(fired);
        assert_eq!(controller.state(), TrialState::AwaitingResponse);
    }
}
