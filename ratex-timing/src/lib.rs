pub mod timer;

pub use timer::{HighPrecisionTimer, ManualTimer, Timer, to_whole_millis};
