pub mod dynamic;
pub mod measurement;

pub trait DynamicModel {
    type State;
    type Covariance;
    type Transition;

    fn f(&self, x: &Self::State, ts: f64) -> Self::State;
    fn F(&self, ts: f64) -> Self::Transition;
    fn Q(&self, ts: f64) -> Self::Covariance;
}

pub trait MeasurementModel {
    type State;
    type Measurement;
    type Observation;
    type Covariance;

    fn h(&self, x: &Self::State) -> Self::Measurement;
    fn H(&self) -> Self::Observation;
    fn R(&self) -> Self::Covariance;
}
