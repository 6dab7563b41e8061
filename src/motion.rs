//! Synthetic target: circular motion with a linear drift, observed through a noisy position sensor.
//!
//! The true state is re-derived analytically from the elapsed time on every tick, so the
//! trajectory does not accumulate integration error and only the observations are random.
//! The kinematics passed to the constructors are what [`MotionSource::true_state`] reports
//! before the first measurement; after that the motion law alone decides the state.

use crate::config::{self, MotionConfig};
use crate::error::ConfigError;
use nalgebra::{Vector2, Vector4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Position law `r (cos wt, sin wt) + t d`.
///
/// The reported velocity is the derivative of the circular part plus `velocity_bias` on each
/// axis. The drift term is not differentiated, so with the defaults the reported velocity sits
/// 0.05 above the actual rate of change of the position.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularDrift {
    pub radius: f64,
    pub angular_velocity: f64,
    pub drift_rate: f64,
    pub velocity_bias: f64,
}

impl Default for CircularDrift {
    fn default() -> Self {
        CircularDrift {
            radius: 3.0,
            angular_velocity: 0.5,
            drift_rate: 0.05,
            velocity_bias: 0.1,
        }
    }
}

impl CircularDrift {
    pub fn position(&self, t: f64) -> Vector2<f64> {
        let phase = self.angular_velocity * t;
        Vector2::new(
            self.radius * phase.cos() + t * self.drift_rate,
            self.radius * phase.sin() + t * self.drift_rate,
        )
    }

    pub fn velocity(&self, t: f64) -> Vector2<f64> {
        let phase = self.angular_velocity * t;
        let speed = self.radius * self.angular_velocity;
        Vector2::new(
            -speed * phase.sin() + self.velocity_bias,
            speed * phase.cos() + self.velocity_bias,
        )
    }

    /// [x, y, vx, vy] at elapsed time `t`
    pub fn state(&self, t: f64) -> Vector4<f64> {
        let p = self.position(t);
        let v = self.velocity(t);
        Vector4::new(p[0], p[1], v[0], v[1])
    }
}

pub struct MotionSource<R: Rng = StdRng> {
    law: CircularDrift,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    time: f64,
    noise: Normal<f64>,
    rng: R,
}

impl MotionSource<StdRng> {
    /// Entropy seeded source with the default motion law.
    pub fn new(x0: f64, y0: f64, vx0: f64, vy0: f64, noise_std: f64) -> Result<Self, ConfigError> {
        Self::with_rng(x0, y0, vx0, vy0, noise_std, StdRng::from_entropy())
    }

    pub fn from_config(config: &MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let [x0, y0, vx0, vy0] = config.initial_state;
        let law = CircularDrift {
            radius: config.radius,
            angular_velocity: config.angular_velocity,
            drift_rate: config.drift_rate,
            velocity_bias: config.velocity_bias,
        };
        Ok(Self::with_rng(x0, y0, vx0, vy0, config.noise_std, rng)?.with_law(law))
    }
}

impl<R: Rng> MotionSource<R> {
    pub fn with_rng(
        x0: f64,
        y0: f64,
        vx0: f64,
        vy0: f64,
        noise_std: f64,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let noise_std = config::non_negative("noise_std", noise_std)?;
        let noise = Normal::new(0.0, noise_std).map_err(|_| ConfigError::NonFinite {
            name: "noise_std",
            value: noise_std,
        })?;
        Ok(MotionSource {
            law: CircularDrift::default(),
            x: x0,
            y: y0,
            vx: vx0,
            vy: vy0,
            time: 0.0,
            noise,
            rng,
        })
    }

    pub fn with_law(mut self, law: CircularDrift) -> Self {
        self.law = law;
        self
    }

    /// Advance the clock by `dt` and return a noisy observation of the new position.
    pub fn measurement(&mut self, dt: f64) -> Result<Vector2<f64>, ConfigError> {
        let dt = config::non_negative("dt", dt)?;
        self.time += dt;

        let truth = self.law.state(self.time);
        self.x = truth[0];
        self.y = truth[1];
        self.vx = truth[2];
        self.vy = truth[3];

        let noise_x = self.noise.sample(&mut self.rng);
        let noise_y = self.noise.sample(&mut self.rng);
        Ok(Vector2::new(self.x + noise_x, self.y + noise_y))
    }

    pub fn true_state(&self) -> Vector4<f64> {
        Vector4::new(self.x, self.y, self.vx, self.vy)
    }

    pub fn elapsed(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(noise_std: f64, seed: u64) -> MotionSource {
        MotionSource::with_rng(0.0, 0.0, 1.0, 1.0, noise_std, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn first_noiseless_tick() {
        let mut target = MotionSource::new(0.0, 0.0, 1.0, 1.0, 0.0).unwrap();
        let z = target.measurement(0.1).unwrap();
        let truth = target.true_state();

        assert!((target.elapsed() - 0.1).abs() < 1e-15);
        assert!((truth[0] - (3.0 * 0.05f64.cos() + 0.005)).abs() < 1e-12);
        assert!((truth[1] - (3.0 * 0.05f64.sin() + 0.005)).abs() < 1e-12);
        assert!((truth[0] - 3.00125).abs() < 1e-5);
        assert!((truth[1] - 0.15497).abs() < 1e-4);
        assert_eq!(z, Vector2::new(truth[0], truth[1]));
    }

    #[test]
    fn noiseless_measurements_are_exact() {
        let mut target = seeded(0.0, 3);
        for _ in 0..100 {
            let z = target.measurement(0.1).unwrap();
            let truth = target.true_state();
            assert_eq!(z[0], truth[0]);
            assert_eq!(z[1], truth[1]);
        }
    }

    #[test]
    fn reports_constructor_state_before_first_tick() {
        let target = MotionSource::new(0.5, -1.5, 1.0, 2.0, 0.1).unwrap();
        assert_eq!(target.true_state(), Vector4::new(0.5, -1.5, 1.0, 2.0));
        assert_eq!(target.elapsed(), 0.0);
    }

    #[test]
    fn true_velocity_is_biased_derivative() {
        let mut target = seeded(0.0, 1);
        target.measurement(1.3).unwrap();
        let t = target.elapsed();
        let truth = target.true_state();
        let w = 0.5;
        assert!((truth[2] - (-3.0 * w * (w * t).sin() + 0.1)).abs() < 1e-12);
        assert!((truth[3] - (3.0 * w * (w * t).cos() + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn law_velocity_matches_position_change() {
        let law = CircularDrift {
            velocity_bias: 0.05,
            ..Default::default()
        };
        let h = 1e-6;
        for &t in &[0.0, 0.7, 2.0, 5.5] {
            let numeric = (law.position(t + h) - law.position(t - h)) / (2.0 * h);
            assert!(numeric.relative_eq(&law.velocity(t), 1e-6, 1e-6));
        }
    }

    #[test]
    fn same_seed_same_measurements() {
        let mut a = seeded(0.1, 42);
        let mut b = seeded(0.1, 42);
        let mut c = seeded(0.1, 43);
        let mut differs = false;
        for _ in 0..10 {
            let za = a.measurement(0.1).unwrap();
            let zb = b.measurement(0.1).unwrap();
            let zc = c.measurement(0.1).unwrap();
            assert_eq!(za, zb);
            differs |= za != zc;
        }
        assert!(differs);
    }

    #[test]
    fn repeated_calls_advance_time() {
        let mut target = seeded(0.0, 5);
        let first = target.measurement(0.1).unwrap();
        let second = target.measurement(0.1).unwrap();
        assert_ne!(first, second);
        assert!((target.elapsed() - 0.2).abs() < 1e-15);
    }

    #[test]
    fn noise_has_configured_spread() {
        let noise_std = 0.1;
        let mut target = seeded(noise_std, 2024);
        let mut residuals = Vec::new();
        for _ in 0..2000 {
            let z = target.measurement(0.1).unwrap();
            let truth = target.true_state();
            residuals.push(z[0] - truth[0]);
            residuals.push(z[1] - truth[1]);
        }
        let n = residuals.len() as f64;
        let mean = residuals.iter().sum::<f64>() / n;
        let std = (residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n).sqrt();
        assert!(mean.abs() < 0.01);
        assert!((std - noise_std).abs() < 0.01);
    }

    #[test]
    fn rejects_negative_noise() {
        assert!(matches!(
            MotionSource::new(0.0, 0.0, 1.0, 1.0, -0.1),
            Err(ConfigError::Negative { name: "noise_std", .. })
        ));
    }

    #[test]
    fn rejects_negative_dt() {
        let mut target = seeded(0.1, 9);
        target.measurement(0.1).unwrap();
        let before = target.true_state();
        assert!(target.measurement(-0.1).is_err());
        assert_eq!(target.true_state(), before);
        assert!((target.elapsed() - 0.1).abs() < 1e-15);
    }

    #[test]
    fn from_config_uses_law_and_seed() {
        let config = MotionConfig {
            radius: 1.0,
            drift_rate: 0.0,
            noise_std: 0.0,
            seed: Some(1),
            ..Default::default()
        };
        let mut target = MotionSource::from_config(&config).unwrap();
        let z = target.measurement(std::f64::consts::PI).unwrap();
        // Half a radian of phase per second
        assert!(z.relative_eq(&Vector2::new((0.5 * std::f64::consts::PI).cos(), 1.0), 1e-12, 1e-12));
    }
}
