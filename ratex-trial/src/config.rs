use ratex_core::{DefaultValuePolicy, TimingPolicy, fixed_default};

/// Host-tunable controller behavior. Out of the box the clock starts at
/// controller entry, every scale opens on a literal 50, the
/// `required` flag is declared but never enforced, and the finalized record
/// is echoed to stdout.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub timing: TimingPolicy,
    pub default_value: DefaultValuePolicy,
    pub enforce_required: bool,
    pub echo_record: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            timing: TimingPolicy::default(),
            default_value: fixed_default,
            enforce_required: false,
            echo_record: true,
        }
    }
}
