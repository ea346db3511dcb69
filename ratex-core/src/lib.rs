pub mod error;
pub mod policy;
pub mod response;
pub mod scale;
pub mod state;
pub mod surface;
pub mod trial;

pub use error::{ConfigError, TrialError};
pub use policy::{DefaultValuePolicy, TimingPolicy, fixed_default, midpoint_default,
    violated_required};
pub use response::ResponseRecord;
pub use scale::ScaleDescriptor;
pub use state::{LiveScaleState, TrialState};
pub use surface::{NullSurface, TrialSurface};
pub use trial::TrialConfig;
