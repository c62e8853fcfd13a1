//! Benchmark association, alignment and error metrics.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nalgebra::{UnitQuaternion, Vector3};
use pariksha::evaluation::{AbsolutePoseError, PoseRelation, RelativePoseError, RpeSettings};
use pariksha::{PoseErrorEvaluator, RegionDetector, Sim3, Trajectory, associate, umeyama_alignment};

fn create_trajectory(n: usize, dt: f64) -> Trajectory {
    let stamps = (0..n).map(|i| i as f64 * dt).collect();
    let positions = (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            Vector3::new(t.cos(), t.sin(), 0.2 * t)
        })
        .collect();
    let orientations = (0..n)
        .map(|i| UnitQuaternion::from_euler_angles(0.0, 0.0, i as f64 * dt))
        .collect();
    Trajectory::new(stamps, positions, orientations).unwrap()
}

fn create_estimate(reference: &Trajectory) -> Trajectory {
    // Simple deterministic "noise" on top of a similarity transform
    let sim = Sim3 {
        rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, 0.4),
        translation: Vector3::new(1.0, -0.5, 0.2),
        scale: 1.5,
    };
    let moved = reference.transformed(&sim);
    let positions = moved
        .positions()
        .iter()
        .enumerate()
        .map(|(i, p)| p + Vector3::new((i as f64 * 0.7).sin(), (i as f64 * 1.3).cos(), 0.0) * 0.01)
        .collect();
    Trajectory::new(
        moved.timestamps().to_vec(),
        positions,
        moved.orientations().to_vec(),
    )
    .unwrap()
}

fn bench_association(c: &mut Criterion) {
    let mut group = c.benchmark_group("association");

    for n in [1_000, 10_000, 50_000].iter() {
        let reference = create_trajectory(*n, 0.01);
        let estimate = create_trajectory(*n / 2, 0.02).with_time_offset(0.003);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let assoc = associate(black_box(&reference), black_box(&estimate), 0.05, 0.0);
                black_box(assoc)
            })
        });
    }

    group.finish();
}

fn bench_umeyama(c: &mut Criterion) {
    let mut group = c.benchmark_group("umeyama_alignment");

    for n in [100, 1_000, 10_000].iter() {
        let reference = create_trajectory(*n, 0.05);
        let estimate = create_estimate(&reference);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let sim = umeyama_alignment(
                    black_box(estimate.positions()),
                    black_box(reference.positions()),
                    true,
                );
                black_box(sim)
            })
        });
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_error");

    for n in [1_000, 10_000].iter() {
        let reference = create_trajectory(*n, 0.05);
        let estimate = create_estimate(&reference);
        let rpe_frames = RpeSettings::default();
        let rpe_meters = RpeSettings::offset_search();

        group.bench_with_input(BenchmarkId::new("ape", n), n, |b, _| {
            b.iter(|| {
                black_box(AbsolutePoseError::compute(
                    black_box(&reference),
                    black_box(&estimate),
                    PoseRelation::TranslationPart,
                ))
            })
        });

        group.bench_with_input(BenchmarkId::new("rpe_frames", n), n, |b, _| {
            b.iter(|| {
                black_box(RelativePoseError::compute(
                    black_box(&reference),
                    black_box(&estimate),
                    &rpe_frames,
                ))
            })
        });

        group.bench_with_input(BenchmarkId::new("rpe_meters", n), n, |b, _| {
            b.iter(|| {
                black_box(RelativePoseError::compute(
                    black_box(&reference),
                    black_box(&estimate),
                    &rpe_meters,
                ))
            })
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    for n in [1_000, 10_000].iter() {
        let reference = create_trajectory(*n, 0.05);
        let estimate = create_estimate(&reference);
        let evaluator = PoseErrorEvaluator::default();
        let detector = RegionDetector::default();

        group.bench_with_input(BenchmarkId::new("detect_regions", n), n, |b, _| {
            b.iter(|| black_box(detector.detect(black_box(&estimate))))
        });

        group.bench_with_input(BenchmarkId::new("evaluate", n), n, |b, _| {
            b.iter(|| black_box(evaluator.evaluate(black_box(&reference), black_box(&estimate))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_association,
    bench_umeyama,
    bench_metrics,
    bench_pipeline
);
criterion_main!(benches);
