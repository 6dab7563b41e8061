use super::DynamicModel;
use nalgebra::{Matrix4, Vector4};

/// Constant velocity model over [x, y, vx, vy] with piecewise white-noise acceleration.
#[derive(Debug, Clone)]
pub struct CV {
    // Process noise intensity
    q: f64,
}

impl CV {
    pub fn new(q: f64) -> Self {
        CV { q }
    }
}

impl DynamicModel for CV {
    type State = Vector4<f64>;
    type Covariance = Matrix4<f64>;
    type Transition = Matrix4<f64>;

    fn f(&self, x: &Self::State, ts: f64) -> Self::State {
        Vector4::new(x[0] + ts * x[2], x[1] + ts * x[3], x[2], x[3])
    }

    fn F(&self, ts: f64) -> Self::Transition {
        let mut F = Matrix4::identity();
        F[(0, 2)] = ts;
        F[(1, 3)] = ts;
        F
    }

    fn Q(&self, ts: f64) -> Self::Covariance {
        let ts2 = ts * ts;
        let ts3 = ts2 * ts;
        let ts4 = ts3 * ts;

        let mut Q = Matrix4::zeros();
        Q[(0, 0)] = ts4 / 4.0;
        Q[(1, 1)] = ts4 / 4.0;
        Q[(0, 2)] = ts3 / 2.0;
        Q[(1, 3)] = ts3 / 2.0;
        Q[(2, 0)] = ts3 / 2.0;
        Q[(3, 1)] = ts3 / 2.0;
        Q[(2, 2)] = ts2;
        Q[(3, 3)] = ts2;
        Q *= self.q;
        Q
    }
}
