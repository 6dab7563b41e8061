#![allow(non_snake_case)]
pub mod config;
pub mod consistency;
pub mod error;
pub mod motion;
pub mod simulator;
pub mod state_estimator;

pub use error::{ConfigError, EstimationError, EstimationResult, SimulationError};
