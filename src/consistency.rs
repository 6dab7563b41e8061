use crate::error::EstimationResult;
use crate::simulator::TickRecord;
use itertools::izip;

pub trait Consistency {
    type Params;
    type Measurement;
    type GroundTruth;

    /// Normalised innovation squared of `z` against the belief
    fn NIS(&self, eststate: &Self::Params, z: &Self::Measurement) -> EstimationResult<f64>;
    /// Normalised estimation error squared against the true state
    fn NEES(&self, eststate: &Self::Params, x_gt: &Self::GroundTruth) -> EstimationResult<f64>;
}

/// Root mean square of the euclidean distance between paired 2-vectors.
pub fn rmse(estimates: &[[f64; 2]], truths: &[[f64; 2]]) -> f64 {
    let n = estimates.len().min(truths.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = izip!(estimates, truths)
        .map(|(e, t)| (e[0] - t[0]).powi(2) + (e[1] - t[1]).powi(2))
        .sum();
    (sum_sq / n as f64).sqrt()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Aggregate tracking quality over a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSummary {
    pub ticks: usize,
    pub skipped_updates: usize,
    pub position_rmse: f64,
    pub velocity_rmse: f64,
    pub measurement_rmse: f64,
    pub mean_nis: Option<f64>,
    pub mean_nees: Option<f64>,
}

impl TrackingSummary {
    pub fn from_records(records: &[TickRecord]) -> Self {
        let true_pos: Vec<[f64; 2]> = records.iter().map(|r| r.true_position).collect();
        let true_vel: Vec<[f64; 2]> = records.iter().map(|r| r.true_velocity).collect();
        let est_pos: Vec<[f64; 2]> = records.iter().map(|r| r.estimated_position).collect();
        let est_vel: Vec<[f64; 2]> = records.iter().map(|r| r.estimated_velocity).collect();
        let measured: Vec<[f64; 2]> = records.iter().map(|r| r.measurement).collect();

        TrackingSummary {
            ticks: records.len(),
            skipped_updates: records.iter().filter(|r| !r.updated).count(),
            position_rmse: rmse(&est_pos, &true_pos),
            velocity_rmse: rmse(&est_vel, &true_vel),
            measurement_rmse: rmse(&measured, &true_pos),
            mean_nis: mean(records.iter().filter_map(|r| r.nis)),
            mean_nees: mean(records.iter().filter_map(|r| r.nees)),
        }
    }
}
