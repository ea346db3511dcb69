use crate::scale::ScaleDescriptor;
use crate::state::LiveScaleState;

/// Start position given to every scale at render time
pub type DefaultValuePolicy = fn(&ScaleDescriptor) -> i64;

/// Every scale opens on a literal 50, no matter what range its descriptor
/// declares. Values outside [min, max] are NOT clamped.
pub fn fixed_default(_descriptor: &ScaleDescriptor) -> i64 {
    50
}

/// Range midpoint, for hosts that want the start position inside the range.
pub fn midpoint_default(descriptor: &ScaleDescriptor) -> i64 {
    (descriptor.min + descriptor.max) / 2
}

/// When the response clock starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingPolicy {
    /// Clock starts when the controller enters the trial, before the submit
    /// control is wired.
    #[default]
    ControllerStart,
    /// Clock starts once the surface reports ready.
    PaintComplete,
}

/// Names of required scales the participant never touched. Pure; the
/// controller only consults this when required-enforcement is switched on.
pub fn violated_required(
    descriptors: &[ScaleDescriptor],
    live: &[LiveScaleState],
) -> Vec<String> {
    descriptors
        .iter()
        .zip(live)
        .filter(|(d, s)| d.required && !s.touched)
        .map(|(d, _)| d.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_default_ignores_range() {
        let d = ScaleDescriptor::new("p", 0, 10);
        assert_eq!(fixed_default(&d), 50);
    }

    #[test]
    fn midpoint_default_splits_range() {
        let d = ScaleDescriptor::new("p", 10, 30);
        assert_eq!(midpoint_default(&d), 20);
    }

    #[test]
    fn violated_required_reports_untouched_names() {
        let descriptors = vec![
            ScaleDescriptor {
                name: "a".into(),
                ..ScaleDescriptor::new("p", 0, 10)
            },
            ScaleDescriptor {
                name: "b".into(),
                required: false,
                ..ScaleDescriptor::new("p", 0, 10)
            },
            ScaleDescriptor {
                name: "c".into(),
                ..ScaleDescriptor::new("p", 0, 10)
            },
        ];
        let mut live: Vec<LiveScaleState> = descriptors
            .iter()
            .map(|d| LiveScaleState::initial(d, fixed_default))
            .collect();
        live[0].set(3);

        assert_eq!(violated_required(&descriptors, &live), vec!["c".to_string()]);
    }
}
