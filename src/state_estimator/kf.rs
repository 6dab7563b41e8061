use super::models::{dynamic::CV, measurement::CartesianPosition, DynamicModel, MeasurementModel};
use super::{CovarianceMatrix, Measurement, StateEstimator, StateVector};
use crate::config::EstimatorConfig;
use crate::consistency::Consistency;
use crate::error::{ConfigError, EstimationError, EstimationResult};
use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};
use tracing::{debug, warn};

/// Mean and covariance of the belief.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussParams {
    pub x: StateVector,
    pub P: CovarianceMatrix,
}

impl GaussParams {
    pub fn new(x: StateVector, P: CovarianceMatrix) -> Self {
        GaussParams { x, P }
    }

    fn is_finite(&self) -> bool {
        self.x.iter().chain(self.P.iter()).all(|v| v.is_finite())
    }
}

/// Linear Kalman filter owning its belief.
pub struct KalmanFilter<D, M>
where
    D: DynamicModel,
    M: MeasurementModel,
{
    dynmod: D,
    measmod: M,
    belief: GaussParams,
}

/// The filter used for point targets: constant velocity dynamics, position measurements.
pub type ConstantVelocityKF = KalmanFilter<CV, CartesianPosition>;

impl<D, M> KalmanFilter<D, M>
where
    D: DynamicModel<State = Vector4<f64>, Transition = Matrix4<f64>, Covariance = Matrix4<f64>>,
    M: MeasurementModel<
        State = Vector4<f64>,
        Measurement = Vector2<f64>,
        Observation = Matrix2x4<f64>,
        Covariance = Matrix2<f64>,
    >,
{
    pub fn new(dynmod: D, measmod: M, init: GaussParams) -> Self {
        KalmanFilter {
            dynmod,
            measmod,
            belief: init,
        }
    }

    pub fn belief(&self) -> GaussParams {
        self.belief
    }

    /// Innovation `z - h(x)` and its covariance `H P H' + R` for the given belief.
    pub fn innovation(&self, eststate: &GaussParams, z: &Measurement) -> (Vector2<f64>, Matrix2<f64>) {
        let v = self.innovation_mean(eststate, z);
        let S = self.innovation_cov(eststate);
        (v, S)
    }

    fn innovation_mean(&self, eststate: &GaussParams, z: &Measurement) -> Vector2<f64> {
        let zpred = self.measmod.h(&eststate.x);
        z - zpred
    }

    fn innovation_cov(&self, eststate: &GaussParams) -> Matrix2<f64> {
        let H = self.measmod.H();
        let R = self.measmod.R();
        H * eststate.P * H.transpose() + R
    }
}

impl ConstantVelocityKF {
    /// Zero state with `initial_variance * I` uncertainty.
    pub fn from_config(config: &EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: &EstimatorConfig) -> Self {
        let init = GaussParams::new(
            Vector4::zeros(),
            Matrix4::identity() * config.initial_variance,
        );
        KalmanFilter::new(
            CV::new(config.process_noise_intensity),
            CartesianPosition::new(config.observation_variance),
            init,
        )
    }
}

impl Default for ConstantVelocityKF {
    fn default() -> Self {
        Self::with_config(&EstimatorConfig::default())
    }
}

impl<D, M> StateEstimator for KalmanFilter<D, M>
where
    D: DynamicModel<State = Vector4<f64>, Transition = Matrix4<f64>, Covariance = Matrix4<f64>>,
    M: MeasurementModel<
        State = Vector4<f64>,
        Measurement = Vector2<f64>,
        Observation = Matrix2x4<f64>,
        Covariance = Matrix2<f64>,
    >,
{
    type State = StateVector;
    type Covariance = CovarianceMatrix;
    type Measurement = Measurement;

    fn predict(&mut self, ts: f64) -> EstimationResult<()> {
        if !ts.is_finite() || ts < 0.0 {
            return Err(EstimationError::InvalidTimeStep(ts));
        }
        let GaussParams { x, P } = self.belief;
        let F = self.dynmod.F(ts);
        let Q = self.dynmod.Q(ts);

        let x = self.dynmod.f(&x, ts);
        let P = F * P * F.transpose() + Q;
        debug!(ts, trace = P.trace(), "predict");

        self.belief = GaussParams::new(x, P);
        Ok(())
    }

    fn update(&mut self, z: &Self::Measurement) -> EstimationResult<()> {
        if !z.iter().all(|v| v.is_finite()) {
            return Err(EstimationError::NonFiniteMeasurement);
        }
        let (v, S) = self.innovation(&self.belief, z);

        let S_inv = match S.try_inverse() {
            Some(S_inv) if S_inv.iter().all(|s| s.is_finite()) => S_inv,
            _ => {
                warn!(determinant = S.determinant(), "innovation covariance not invertible");
                return Err(EstimationError::SingularInnovation);
            }
        };

        let GaussParams { x, P } = self.belief;
        let H = self.measmod.H();

        // Kalman gain
        let W = P * H.transpose() * S_inv;

        let I = Matrix4::identity();
        let P = (I - W * H) * P;
        // Round-off slowly breaks symmetry
        let P = (P + P.transpose()) * 0.5;
        let x = x + W * v;

        let updated = GaussParams::new(x, P);
        if !updated.is_finite() {
            warn!("update produced a non-finite belief");
            return Err(EstimationError::SingularInnovation);
        }
        debug!(innovation = v.norm(), trace = P.trace(), "update");

        self.belief = updated;
        Ok(())
    }

    fn state(&self) -> Self::State {
        self.belief.x
    }

    fn covariance(&self) -> Self::Covariance {
        self.belief.P
    }
}

impl<D, M> Consistency for KalmanFilter<D, M>
where
    D: DynamicModel<State = Vector4<f64>, Transition = Matrix4<f64>, Covariance = Matrix4<f64>>,
    M: MeasurementModel<
        State = Vector4<f64>,
        Measurement = Vector2<f64>,
        Observation = Matrix2x4<f64>,
        Covariance = Matrix2<f64>,
    >,
{
    type Params = GaussParams;
    type Measurement = Measurement;
    type GroundTruth = StateVector;

    fn NIS(&self, eststate: &GaussParams, z: &Measurement) -> EstimationResult<f64> {
        let (v, S) = self.innovation(eststate, z);
        let S_inv_v = S
            .cholesky()
            .ok_or(EstimationError::NotPositiveDefinite("innovation covariance"))?
            .solve(&v);
        Ok(v.dot(&S_inv_v))
    }

    fn NEES(&self, eststate: &GaussParams, x_gt: &StateVector) -> EstimationResult<f64> {
        let x_err = eststate.x - x_gt;
        let P_inv_x_err = eststate
            .P
            .cholesky()
            .ok_or(EstimationError::NotPositiveDefinite("state covariance"))?
            .solve(&x_err);
        Ok(x_err.dot(&P_inv_x_err))
    }
}
