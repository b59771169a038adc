//! Synthetic detector results and observations
//!
//! Positions are image-normalized and laid out so that every structure has
//! a non-zero reference depth, which keeps displacement features finite.

use signa_core::{
    FrameMeta, FrameTime, HandDetection, HandResult, Handedness, LandmarkSet, Observation,
    PoseDetection, PoseResult, HAND_LANDMARKS, POSE_LANDMARKS,
};

/// Hand landmarks fanned out from a wrist at `(x, y)`
pub fn hand_landmarks(x: f32, y: f32) -> LandmarkSet {
    let rows: Vec<[f32; 3]> = (0..HAND_LANDMARKS)
        .map(|i| {
            let t = i as f32 / HAND_LANDMARKS as f32;
            [x + 0.05 * t, y - 0.08 * t, 0.1 + 0.01 * t]
        })
        .collect();
    LandmarkSet::from_rows(&rows)
}

/// Metric hand landmarks, offset by `x`
pub fn hand_world_landmarks(x: f32) -> LandmarkSet {
    let rows: Vec<[f32; 3]> = (0..HAND_LANDMARKS)
        .map(|i| [x + 0.004 * i as f32, -0.006 * i as f32, 0.002 * i as f32])
        .collect();
    LandmarkSet::from_rows(&rows)
}

/// Body pose landmarks shifted horizontally by `x`
pub fn pose_landmarks(x: f32) -> LandmarkSet {
    let rows: Vec<[f32; 3]> = (0..POSE_LANDMARKS)
        .map(|i| {
            let t = i as f32 / POSE_LANDMARKS as f32;
            [x + 0.3 * t, 0.2 + 0.6 * t, 0.3 + 0.1 * t]
        })
        .collect();
    LandmarkSet::from_rows(&rows)
}

pub fn pose_world_landmarks(x: f32) -> LandmarkSet {
    let rows: Vec<[f32; 3]> = (0..POSE_LANDMARKS)
        .map(|i| [x + 0.01 * i as f32, 0.5 - 0.02 * i as f32, -0.1])
        .collect();
    LandmarkSet::from_rows(&rows)
}

/// One detected hand with a raw (mirrored) label
pub fn hand_detection(label: Handedness, score: f32, x: f32) -> HandDetection {
    HandDetection {
        handedness: label,
        score,
        landmarks: hand_landmarks(x, 0.6),
        world_landmarks: hand_world_landmarks(x),
    }
}

/// Both hands of a signer standing at `x`
pub fn two_hands(x: f32) -> HandResult {
    HandResult::new(vec![
        hand_detection(Handedness::Right, 0.95, x - 0.1),
        hand_detection(Handedness::Left, 0.93, x + 0.1),
    ])
}

pub fn pose_result(x: f32) -> PoseResult {
    PoseResult::new(vec![PoseDetection {
        landmarks: pose_landmarks(x),
        world_landmarks: pose_world_landmarks(x),
    }])
}

/// Observation with both hands and a pose
///
/// `phase` moves the signer horizontally so consecutive frames differ.
pub fn signing_observation(timestamp: FrameTime, phase: f32) -> Observation {
    let x = 0.4 + 0.05 * phase.sin();
    Observation {
        left_hand: Some(hand_landmarks(x - 0.1, 0.6)),
        left_hand_world: Some(hand_world_landmarks(x - 0.1)),
        right_hand: Some(hand_landmarks(x + 0.1, 0.6)),
        right_hand_world: Some(hand_world_landmarks(x + 0.1)),
        pose: Some(pose_landmarks(x)),
        pose_world: Some(pose_world_landmarks(x)),
        timestamp,
        image_width: 640,
        image_height: 480,
        ..Default::default()
    }
}

/// Observation with only a pose, as when the hands are out of frame
pub fn idle_observation(timestamp: FrameTime) -> Observation {
    Observation {
        pose: Some(pose_landmarks(0.4)),
        pose_world: Some(pose_world_landmarks(0.4)),
        timestamp,
        image_width: 640,
        image_height: 480,
        ..Default::default()
    }
}

/// Observations every `interval_ms`, starting at `start_ms`
pub fn signing_sequence(start_ms: i64, interval_ms: i64, count: usize) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let ts = FrameTime::from_millis(start_ms + i as i64 * interval_ms);
            signing_observation(ts, i as f32 * 0.3)
        })
        .collect()
}

/// Detector halves for `count` frames every `interval_ms`
pub fn detector_frames(interval_ms: i64, count: usize) -> Vec<(FrameMeta, HandResult, PoseResult)> {
    (0..count)
        .map(|i| {
            let meta = FrameMeta::new(FrameTime::from_millis(i as i64 * interval_ms), 640, 480);
            let x = 0.4 + 0.01 * i as f32;
            (meta, two_hands(x), pose_result(x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structures_have_full_landmark_counts() {
        let observation = signing_observation(FrameTime::ZERO, 0.0);
        assert_eq!(observation.left_hand.as_ref().map(LandmarkSet::len), Some(21));
        assert_eq!(observation.pose_world.as_ref().map(LandmarkSet::len), Some(33));
        assert!(!idle_observation(FrameTime::ZERO).has_hands());
    }

    #[test]
    fn test_reference_depths_non_zero() {
        let hand = hand_landmarks(0.3, 0.5);
        assert!(hand.get(0).map_or(false, |wrist| wrist.z != 0.0));

        let pose = pose_landmarks(0.4);
        let hips = pose.get(23).zip(pose.get(24)).map(|(l, r)| (l.z + r.z) / 2.0);
        assert!(hips.map_or(false, |z| z != 0.0));
    }

    #[test]
    fn test_sequence_timestamps() {
        let frames = signing_sequence(100, 33, 4);
        let ts: Vec<i64> = frames.iter().map(|o| o.timestamp.as_millis()).collect();
        assert_eq!(ts, vec![100, 133, 166, 199]);
    }
}
