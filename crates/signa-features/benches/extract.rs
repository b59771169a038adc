//! Benchmarks for per-frame feature extraction

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use signa_core::{FrameTime, LandmarkSet, Observation, SignaResult};
use signa_features::{
    hand_depth, normalized_displacement, FeatureExtractor, RotationRow, MIN_ROTATION_ROWS,
};

fn identity_solver(
    _: &[[f32; 3]],
    _: &[[f32; 3]],
    _: &[[f32; 3]],
) -> SignaResult<Vec<RotationRow>> {
    Ok(vec![[1.0, 0.0, 0.0, 0.0]; MIN_ROTATION_ROWS])
}

fn observation(ms: i64) -> Observation {
    let shift = (ms % 100) as f32 * 0.001;
    let hand: Vec<[f32; 3]> = (0..21).map(|i| [0.3 + shift + i as f32 * 0.01, 0.5, 0.1]).collect();
    let pose: Vec<[f32; 3]> = (0..33).map(|i| [0.4 + shift + i as f32 * 0.01, 0.5, 0.3]).collect();

    Observation {
        left_hand: Some(LandmarkSet::from_rows(&hand)),
        left_hand_world: Some(LandmarkSet::from_rows(&hand)),
        right_hand: Some(LandmarkSet::from_rows(&hand)),
        right_hand_world: Some(LandmarkSet::from_rows(&hand)),
        pose: Some(LandmarkSet::from_rows(&pose)),
        pose_world: Some(LandmarkSet::from_rows(&pose)),
        timestamp: FrameTime::from_millis(ms),
        ..Default::default()
    }
}

fn bench_extract_full_frame(c: &mut Criterion) {
    let mut extractor = FeatureExtractor::new(Box::new(identity_solver));
    let frames: Vec<Observation> = (0..64).map(|i| observation(i * 33)).collect();

    c.bench_function("extract_full_frame", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % frames.len();
            black_box(extractor.extract(black_box(&frames[i])))
        })
    });
}

fn bench_extract_empty_frame(c: &mut Criterion) {
    let mut extractor = FeatureExtractor::new(Box::new(identity_solver));
    let empty = Observation::empty(FrameTime::ZERO);

    c.bench_function("extract_empty_frame", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&empty))))
    });
}

fn bench_hand_displacement(c: &mut Criterion) {
    let prev: Vec<[f32; 3]> = (0..21).map(|i| [0.3 + i as f32 * 0.01, 0.5, 0.1]).collect();
    let curr: Vec<[f32; 3]> = (0..21).map(|i| [0.31 + i as f32 * 0.01, 0.5, 0.1]).collect();

    c.bench_function("hand_displacement", |b| {
        b.iter(|| normalized_displacement(black_box(&prev), black_box(&curr), hand_depth))
    });
}

criterion_group!(
    benches,
    bench_extract_full_frame,
    bench_extract_empty_frame,
    bench_hand_displacement,
);
criterion_main!(benches);
