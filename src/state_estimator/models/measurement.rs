use super::MeasurementModel;
use nalgebra::{Matrix2, Matrix2x4, Vector2, Vector4};

/// Direct observation of the position components, assumed to be the first two states.
#[derive(Debug, Clone)]
pub struct CartesianPosition {
    variance: f64,
}

impl CartesianPosition {
    pub fn new(variance: f64) -> Self {
        CartesianPosition { variance }
    }
}

impl MeasurementModel for CartesianPosition {
    type State = Vector4<f64>;
    type Measurement = Vector2<f64>;
    type Observation = Matrix2x4<f64>;
    type Covariance = Matrix2<f64>;

    fn h(&self, x: &Self::State) -> Self::Measurement {
        Vector2::new(x[0], x[1])
    }

    fn H(&self) -> Self::Observation {
        #[rustfmt::skip]
        let H = Matrix2x4::new(
            1., 0., 0., 0.,
            0., 1., 0., 0.,
        );
        H
    }

    fn R(&self) -> Self::Covariance {
        Matrix2::identity() * self.variance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_position() {
        let model = CartesianPosition::new(0.005);
        let x = Vector4::new(1., 2., 3., 4.);
        #[rustfmt::skip]
        let H_correct = Matrix2x4::new(
            1., 0., 0., 0.,
            0., 1., 0., 0.,
        );
        assert_eq!(model.H(), H_correct);
        assert_eq!(model.h(&x), Vector2::new(1., 2.));
        assert_eq!(model.H() * x, model.h(&x));
    }

    #[test]
    fn diagonal_noise() {
        let model = CartesianPosition::new(0.005);
        assert_eq!(model.R(), Matrix2::new(0.005, 0., 0., 0.005));
    }
}
