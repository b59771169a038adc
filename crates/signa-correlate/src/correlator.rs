//! Landmark correlator - fuses hand and pose results per frame

use signa_core::{FrameClock, FrameMeta, HandResult, Observation, PoseResult};

use crate::{assign_hands, CompletedPair, DetectorHalf, Merge, PendingPairs};

/// Pairs detector callbacks by timestamp and emits fused observations
///
/// Both callback methods may be called concurrently from different detector
/// threads. Exactly one of the two calls for a timestamp returns the
/// observation; after `close` every callback is a no-op.
#[derive(Debug)]
pub struct LandmarkCorrelator {
    pending: PendingPairs,
    clock: FrameClock,
}

impl LandmarkCorrelator {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            pending: PendingPairs::new(),
            clock,
        }
    }

    /// Hand detector callback
    pub fn on_hand_result(&self, result: HandResult, meta: FrameMeta) -> Option<Observation> {
        self.offer(meta, DetectorHalf::Hand(result))
    }

    /// Pose detector callback
    pub fn on_pose_result(&self, result: PoseResult, meta: FrameMeta) -> Option<Observation> {
        self.offer(meta, DetectorHalf::Pose(result))
    }

    fn offer(&self, meta: FrameMeta, half: DetectorHalf) -> Option<Observation> {
        match self.pending.insert_or_take(meta, half) {
            Merge::Stored => None,
            Merge::Closed => {
                tracing::trace!(
                    timestamp = meta.timestamp.as_millis(),
                    "detector result after teardown dropped"
                );
                None
            }
            Merge::Complete(pair) => Some(self.fuse(pair)),
        }
    }

    fn fuse(&self, pair: CompletedPair) -> Observation {
        let CompletedPair { meta, hand, pose } = pair;
        let hands = assign_hands(&hand.hands);
        let primary_pose = pose.primary();

        Observation {
            left_hand: hands.left.map(|h| h.landmarks.clone()),
            left_hand_world: hands.left.map(|h| h.world_landmarks.clone()),
            right_hand: hands.right.map(|h| h.landmarks.clone()),
            right_hand_world: hands.right.map(|h| h.world_landmarks.clone()),
            pose: primary_pose.map(|p| p.landmarks.clone()),
            pose_world: primary_pose.map(|p| p.world_landmarks.clone()),
            timestamp: meta.timestamp,
            image_width: meta.width,
            image_height: meta.height,
            detection_latency: self.clock.now() - meta.timestamp,
        }
    }

    /// Start accepting detector results
    pub fn open(&self) {
        self.pending.open();
    }

    /// Drop pending halves; later callbacks become no-ops
    pub fn close(&self) {
        self.pending.close();
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_open()
    }

    /// Timestamps still waiting for their second half
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_core::{FrameTime, HandDetection, Handedness, LandmarkSet, PoseDetection};
    use std::sync::Arc;

    fn meta(ms: i64) -> FrameMeta {
        FrameMeta::new(FrameTime::from_millis(ms), 640, 480)
    }

    fn hand(label: Handedness, score: f32) -> HandDetection {
        HandDetection {
            handedness: label,
            score,
            landmarks: LandmarkSet::from_rows(&vec![[0.5, 0.5, -0.1]; 21]),
            world_landmarks: LandmarkSet::from_rows(&vec![[score, 0.0, 0.0]; 21]),
        }
    }

    fn pose() -> PoseResult {
        PoseResult::new(vec![PoseDetection {
            landmarks: LandmarkSet::from_rows(&vec![[0.5, 0.5, 0.2]; 33]),
            world_landmarks: LandmarkSet::from_rows(&vec![[0.1, 0.2, 0.3]; 33]),
        }])
    }

    #[test]
    fn test_emits_on_second_half_only() {
        let correlator = LandmarkCorrelator::new(FrameClock::new());

        let first = correlator.on_pose_result(pose(), meta(33));
        assert!(first.is_none());
        assert_eq!(correlator.pending_len(), 1);

        let hands = HandResult::new(vec![hand(Handedness::Right, 0.9)]);
        let observation = correlator.on_hand_result(hands, meta(33)).unwrap();

        assert_eq!(observation.timestamp.as_millis(), 33);
        assert_eq!(observation.image_width, 640);
        assert!(observation.left_hand.is_some());
        assert!(observation.right_hand.is_none());
        assert!(observation.pose_world.is_some());
        assert_eq!(correlator.pending_len(), 0);
    }

    #[test]
    fn test_empty_results_fuse_to_empty_observation() {
        let correlator = LandmarkCorrelator::new(FrameClock::new());
        correlator.on_hand_result(HandResult::empty(), meta(5));
        let observation = correlator.on_pose_result(PoseResult::empty(), meta(5)).unwrap();

        assert!(!observation.has_hands());
        assert!(!observation.has_pose());
    }

    #[test]
    fn test_world_and_image_landmarks_follow_same_hand() {
        let correlator = LandmarkCorrelator::new(FrameClock::new());
        let hands = HandResult::new(vec![
            hand(Handedness::Right, 0.6),
            hand(Handedness::Right, 0.9),
        ]);
        correlator.on_hand_result(hands, meta(1));
        let observation = correlator.on_pose_result(pose(), meta(1)).unwrap();

        let left_world = observation.left_hand_world.unwrap();
        let right_world = observation.right_hand_world.unwrap();
        assert_eq!(left_world.get(0).map(|p| p.x), Some(0.9));
        assert_eq!(right_world.get(0).map(|p| p.x), Some(0.6));
    }

    #[test]
    fn test_closed_correlator_is_noop() {
        let correlator = LandmarkCorrelator::new(FrameClock::new());
        correlator.on_hand_result(HandResult::empty(), meta(7));
        correlator.close();

        assert!(correlator.on_pose_result(pose(), meta(7)).is_none());
        assert_eq!(correlator.pending_len(), 0);
        assert!(!correlator.is_open());
    }

    #[test]
    fn test_concurrent_halves_emit_exactly_once() {
        let correlator = Arc::new(LandmarkCorrelator::new(FrameClock::new()));
        let frames = 500;

        let hand_side = {
            let correlator = Arc::clone(&correlator);
            std::thread::spawn(move || {
                (0..frames)
                    .filter_map(|t| correlator.on_hand_result(HandResult::empty(), meta(t)))
                    .count()
            })
        };
        let pose_side = {
            let correlator = Arc::clone(&correlator);
            std::thread::spawn(move || {
                (0..frames)
                    .rev()
                    .filter_map(|t| correlator.on_pose_result(PoseResult::empty(), meta(t)))
                    .count()
            })
        };

        let emitted = hand_side.join().unwrap() + pose_side.join().unwrap();
        assert_eq!(emitted, frames as usize);
        assert_eq!(correlator.pending_len(), 0);
    }
}
