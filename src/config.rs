use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

/// Noise and prior settings for the constant velocity Kalman filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Diagonal of the initial covariance
    pub initial_variance: f64,
    /// Diagonal of R
    pub observation_variance: f64,
    /// Scale applied to the white-noise-acceleration Q
    pub process_noise_intensity: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            initial_variance: 1000.0,
            observation_variance: 0.005,
            process_noise_intensity: 0.1,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_variance", self.initial_variance)?;
        non_negative("observation_variance", self.observation_variance)?;
        non_negative("process_noise_intensity", self.process_noise_intensity)?;
        Ok(())
    }
}

/// Target trajectory and sensor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// [x, y, vx, vy] reported before the first measurement
    pub initial_state: [f64; 4],
    /// Standard deviation of the position noise
    pub noise_std: f64,
    pub radius: f64,
    pub angular_velocity: f64,
    pub drift_rate: f64,
    pub velocity_bias: f64,
    /// Fixed RNG seed, entropy seeded when absent
    pub seed: Option<u64>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            initial_state: [0.0, 0.0, 1.0, 1.0],
            noise_std: 0.1,
            radius: 3.0,
            angular_velocity: 0.5,
            drift_rate: 0.05,
            velocity_bias: 0.1,
            seed: None,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("noise_std", self.noise_std)?;
        for value in self.initial_state.iter() {
            finite("initial_state", *value)?;
        }
        for (name, value) in [
            ("radius", self.radius),
            ("angular_velocity", self.angular_velocity),
            ("drift_rate", self.drift_rate),
            ("velocity_bias", self.velocity_bias),
        ] {
            finite(name, value)?;
        }
        Ok(())
    }
}

/// Everything needed to run a tracking simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time step per tick
    pub dt: f64,
    /// Number of ticks run by the binary
    pub steps: usize,
    pub estimator: EstimatorConfig,
    pub motion: MotionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            dt: 0.1,
            steps: 200,
            estimator: EstimatorConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dt", self.dt)?;
        self.estimator.validate()?;
        self.motion.validate()
    }
}

pub fn read_config_from_json(config_path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let file = File::open(config_path)?;
    let config: SimulationConfig = serde_json::from_reader(file)?;
    config.validate()?;

    Ok(config)
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(value)
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(value)
}
