pub mod kf;
pub mod models;

use crate::error::EstimationResult;
use nalgebra::{Matrix4, Vector2, Vector4};

/// [x, y, vx, vy]
pub type StateVector = Vector4<f64>;
pub type CovarianceMatrix = Matrix4<f64>;
/// Observed [x, y]
pub type Measurement = Vector2<f64>;

/// A recursive estimator that owns its belief.
///
/// Callers are expected to alternate `predict` and `update` once per tick, but the order is
/// not enforced: an `update` without a preceding `predict` behaves as if `predict(0.0)` had
/// been called.
pub trait StateEstimator {
    type State;
    type Covariance;
    type Measurement;

    fn predict(&mut self, ts: f64) -> EstimationResult<()>;

    fn update(&mut self, z: &Self::Measurement) -> EstimationResult<()>;

    fn step(&mut self, z: &Self::Measurement, ts: f64) -> EstimationResult<()> {
        self.predict(ts)?;
        self.update(z)
    }

    fn state(&self) -> Self::State;

    fn covariance(&self) -> Self::Covariance;
}
