//! Out-of-order delivery harness
//!
//! Replays detector halves into a `LandmarkCorrelator` the way two
//! asynchronous detectors would: each detector thread delivers its own
//! results in a shuffled order, optionally losing some of them.

use std::thread;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use signa_core::{FrameMeta, FrameTime, HandResult, Observation, PoseResult};
use signa_correlate::LandmarkCorrelator;

/// Delivery configuration
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Seed for shuffling and loss
    pub seed: u64,
    /// Probability that a hand result is never delivered (0.0 - 1.0)
    pub hand_loss: f64,
    /// Probability that a pose result is never delivered (0.0 - 1.0)
    pub pose_loss: f64,
    /// Shuffle each detector's delivery order
    pub shuffle: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            hand_loss: 0.0,
            pose_loss: 0.0,
            shuffle: true,
        }
    }
}

impl DeliveryConfig {
    /// In-order, lossless delivery
    pub fn ordered() -> Self {
        Self {
            shuffle: false,
            ..Default::default()
        }
    }

    /// Shuffled delivery losing a share of both halves
    pub fn lossy(seed: u64, loss: f64) -> Self {
        Self {
            seed,
            hand_loss: loss,
            pose_loss: loss,
            shuffle: true,
        }
    }
}

/// What a delivery run produced
#[derive(Debug, Default)]
pub struct DeliveryReport {
    /// Observations emitted by the correlator, in emission order
    pub observations: Vec<Observation>,
    /// Frames whose hand result was lost
    pub lost_hands: Vec<FrameTime>,
    /// Frames whose pose result was lost
    pub lost_poses: Vec<FrameTime>,
}

impl DeliveryReport {
    /// Frames with both halves delivered
    pub fn complete_frames(&self) -> usize {
        self.observations.len()
    }

    /// Emitted timestamps, sorted
    pub fn timestamps(&self) -> Vec<FrameTime> {
        let mut ts: Vec<FrameTime> = self.observations.iter().map(|o| o.timestamp).collect();
        ts.sort();
        ts
    }
}

/// Seeded two-thread delivery of detector halves
pub struct DeliveryHarness {
    config: DeliveryConfig,
    rng: StdRng,
}

impl DeliveryHarness {
    pub fn new(config: DeliveryConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Deliver every frame's halves and collect what the correlator emits
    pub fn deliver(
        &mut self,
        correlator: &LandmarkCorrelator,
        frames: Vec<(FrameMeta, HandResult, PoseResult)>,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut hands = Vec::with_capacity(frames.len());
        let mut poses = Vec::with_capacity(frames.len());

        for (meta, hand, pose) in frames {
            if self.rng.gen_bool(self.config.hand_loss) {
                report.lost_hands.push(meta.timestamp);
            } else {
                hands.push((meta, hand));
            }
            if self.rng.gen_bool(self.config.pose_loss) {
                report.lost_poses.push(meta.timestamp);
            } else {
                poses.push((meta, pose));
            }
        }

        if self.config.shuffle {
            hands.shuffle(&mut self.rng);
            poses.shuffle(&mut self.rng);
        }

        let emitted = Mutex::new(Vec::new());
        thread::scope(|scope| {
            scope.spawn(|| {
                for (meta, hand) in hands {
                    if let Some(observation) = correlator.on_hand_result(hand, meta) {
                        emitted.lock().push(observation);
                    }
                }
            });
            scope.spawn(|| {
                for (meta, pose) in poses {
                    if let Some(observation) = correlator.on_pose_result(pose, meta) {
                        emitted.lock().push(observation);
                    }
                }
            });
        });

        report.observations = emitted.into_inner();
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::detector_frames;
    use signa_core::FrameClock;

    fn open_correlator() -> LandmarkCorrelator {
        let correlator = LandmarkCorrelator::new(FrameClock::new());
        correlator.open();
        correlator
    }

    #[test]
    fn test_ordered_delivery_emits_every_frame() {
        let correlator = open_correlator();
        let mut harness = DeliveryHarness::new(DeliveryConfig::ordered());

        let report = harness.deliver(&correlator, detector_frames(33, 50));

        assert_eq!(report.complete_frames(), 50);
        assert_eq!(correlator.pending_len(), 0);
    }

    #[test]
    fn test_shuffled_delivery_emits_each_frame_once() {
        for seed in 0..8 {
            let correlator = open_correlator();
            let mut harness = DeliveryHarness::new(DeliveryConfig {
                seed,
                ..Default::default()
            });

            let report = harness.deliver(&correlator, detector_frames(33, 100));
            let unique: HashSet<i64> = report
                .observations
                .iter()
                .map(|o| o.timestamp.as_millis())
                .collect();

            assert_eq!(report.complete_frames(), 100);
            assert_eq!(unique.len(), 100);
            assert_eq!(correlator.pending_len(), 0);
        }
    }

    #[test]
    fn test_lost_halves_stay_pending() {
        let correlator = open_correlator();
        let mut harness = DeliveryHarness::new(DeliveryConfig::lossy(7, 0.2));

        let report = harness.deliver(&correlator, detector_frames(33, 200));

        let lost: HashSet<FrameTime> = report
            .lost_hands
            .iter()
            .chain(report.lost_poses.iter())
            .copied()
            .collect();
        let both_lost = report
            .lost_hands
            .iter()
            .filter(|ts| report.lost_poses.contains(ts))
            .count();

        assert_eq!(report.complete_frames(), 200 - lost.len());
        assert_eq!(correlator.pending_len(), lost.len() - both_lost);
        for ts in report.timestamps() {
            assert!(!lost.contains(&ts));
        }
    }

    #[test]
    fn test_same_seed_same_losses() {
        let run = |seed| {
            let correlator = open_correlator();
            let mut harness = DeliveryHarness::new(DeliveryConfig::lossy(seed, 0.3));
            let report = harness.deliver(&correlator, detector_frames(10, 60));
            (report.lost_hands, report.lost_poses)
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_closed_correlator_emits_nothing() {
        let correlator = LandmarkCorrelator::new(FrameClock::new());
        correlator.close();
        let mut harness = DeliveryHarness::new(DeliveryConfig::default());

        let report = harness.deliver(&correlator, detector_frames(33, 20));

        assert_eq!(report.complete_frames(), 0);
        assert_eq!(correlator.pending_len(), 0);
    }
}
