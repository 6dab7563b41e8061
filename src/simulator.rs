use crate::config::{self, SimulationConfig};
use crate::consistency::Consistency;
use crate::error::{ConfigError, SimulationError};
use crate::motion::MotionSource;
use crate::state_estimator::kf::ConstantVelocityKF;
use crate::state_estimator::StateEstimator;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

/// What one tick hands to a display or logger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    pub step: usize,
    pub time: f64,
    pub true_position: [f64; 2],
    pub true_velocity: [f64; 2],
    pub measurement: [f64; 2],
    pub estimated_position: [f64; 2],
    pub estimated_velocity: [f64; 2],
    /// NIS of the measurement against the predicted belief
    pub nis: Option<f64>,
    /// NEES of the updated belief against the true state
    pub nees: Option<f64>,
    /// False when the update was skipped and the prediction kept
    pub updated: bool,
}

/// One target and one filter, stepped together at a fixed rate.
pub struct Simulation<R: Rng = StdRng> {
    target: MotionSource<R>,
    filter: ConstantVelocityKF,
    dt: f64,
    step: usize,
}

impl Simulation<StdRng> {
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let target = MotionSource::from_config(&config.motion)?;
        let filter = ConstantVelocityKF::from_config(&config.estimator)?;
        Self::from_parts(target, filter, config.dt)
    }
}

impl<R: Rng> Simulation<R> {
    pub fn from_parts(
        target: MotionSource<R>,
        filter: ConstantVelocityKF,
        dt: f64,
    ) -> Result<Self, ConfigError> {
        let dt = config::positive("dt", dt)?;
        Ok(Simulation {
            target,
            filter,
            dt,
            step: 0,
        })
    }

    pub fn filter(&self) -> &ConstantVelocityKF {
        &self.filter
    }

    pub fn target(&self) -> &MotionSource<R> {
        &self.target
    }

    /// Measure, predict, update and read back.
    ///
    /// A recoverable update fault is logged and the predicted belief is kept for this tick.
    pub fn tick(&mut self) -> Result<TickRecord, SimulationError> {
        let z = self.target.measurement(self.dt)?;
        let truth = self.target.true_state();

        self.filter.predict(self.dt)?;
        let predicted = self.filter.belief();
        let nis = self.filter.NIS(&predicted, &z).ok();

        let updated = match self.filter.update(&z) {
            Ok(()) => true,
            Err(err) if err.is_recoverable() => {
                warn!(step = self.step, %err, "keeping predicted state");
                false
            }
            Err(err) => return Err(err.into()),
        };

        let belief = self.filter.belief();
        let nees = self.filter.NEES(&belief, &truth).ok();
        let x = belief.x;

        let record = TickRecord {
            step: self.step,
            time: self.target.elapsed(),
            true_position: [truth[0], truth[1]],
            true_velocity: [truth[2], truth[3]],
            measurement: [z[0], z[1]],
            estimated_position: [x[0], x[1]],
            estimated_velocity: [x[2], x[3]],
            nis,
            nees,
            updated,
        };
        debug!(step = record.step, time = record.time, ?nis, ?nees, "tick");

        self.step += 1;
        Ok(record)
    }

    pub fn run(&mut self, steps: usize) -> Result<Vec<TickRecord>, SimulationError> {
        (0..steps).map(|_| self.tick()).collect()
    }
}

/// Build a simulation from `config` and run it for `config.steps` ticks.
pub fn run_tracking(config: &SimulationConfig) -> Result<Vec<TickRecord>, SimulationError> {
    Simulation::new(config)?.run(config.steps)
}
