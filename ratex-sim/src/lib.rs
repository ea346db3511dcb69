pub mod error;
pub mod latency;
pub mod simulator;

pub use error::SimError;
pub use latency::{
    BASE_LATENCY_MS, ExGaussian, LATENCY_MEAN_MS, LATENCY_SKEW_RATE, LATENCY_STD_MS,
};
pub use simulator::{SimulationData, SimulationOptions, Simulator, ensure_consistency};
