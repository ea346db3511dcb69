pub mod collector;
pub mod config;
pub mod controller;

pub use collector::ResponseCollector;
pub use config::ControllerOptions;
pub use controller::{TrialController, TrialEvent, begin_trial};
