use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cv_tracker::{
    config::SimulationConfig,
    motion::MotionSource,
    simulator::Simulation,
    state_estimator::{kf::ConstantVelocityKF, StateEstimator},
};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn criterion_benchmark(c: &mut Criterion) {
    let ts = 0.1;
    let z = Vector2::new(1.0, 1.0);

    let mut kf = ConstantVelocityKF::default();
    c.bench_function("predict", |b| b.iter(|| kf.predict(black_box(ts))));

    let mut kf = ConstantVelocityKF::default();
    kf.predict(ts).unwrap();
    c.bench_function("update", |b| b.iter(|| kf.update(black_box(&z))));

    let mut kf = ConstantVelocityKF::default();
    c.bench_function("step", |b| b.iter(|| kf.step(black_box(&z), black_box(ts))));

    let mut target =
        MotionSource::with_rng(0.0, 0.0, 1.0, 1.0, 0.1, StdRng::seed_from_u64(0)).unwrap();
    c.bench_function("measurement", |b| b.iter(|| target.measurement(black_box(ts))));

    let mut config = SimulationConfig::default();
    config.motion.seed = Some(0);
    c.bench_function("run 200 ticks", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(&config).unwrap();
            sim.run(black_box(200)).unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
