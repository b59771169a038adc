//! Feature extractor - one observation in, one feature vector out

use std::mem;

use signa_core::{
    JointRows, LandmarkSet, Observation, SignaError, SignaResult, HAND_LANDMARKS, POSE_LANDMARKS,
};

use crate::{
    hand_depth, normalized_displacement, pose_depth, sentinel, BoneRotationSolver, Side,
    FEATURE_LEN, MIN_ROTATION_ROWS,
};

/// Fixed-length per-frame features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        FeatureVector(values)
    }
}

/// Previous frame's normalized landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorState {
    left_hand: JointRows,
    right_hand: JointRows,
    pose: JointRows,
}

impl ExtractorState {
    /// All structures at the "not detected" sentinel
    pub fn new() -> Self {
        Self {
            left_hand: sentinel(HAND_LANDMARKS),
            right_hand: sentinel(HAND_LANDMARKS),
            pose: sentinel(POSE_LANDMARKS),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_reset(&self) -> bool {
        *self == Self::new()
    }

    pub fn left_hand(&self) -> &[[f32; 3]] {
        &self.left_hand
    }

    pub fn right_hand(&self) -> &[[f32; 3]] {
        &self.right_hand
    }

    pub fn pose(&self) -> &[[f32; 3]] {
        &self.pose
    }
}

impl Default for ExtractorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Feature extractor with retained previous-frame state
pub struct FeatureExtractor {
    solver: Box<dyn BoneRotationSolver>,
    state: ExtractorState,
}

impl FeatureExtractor {
    pub fn new(solver: Box<dyn BoneRotationSolver>) -> Self {
        Self {
            solver,
            state: ExtractorState::new(),
        }
    }

    /// Length of every vector this extractor produces
    pub fn feature_len(&self) -> usize {
        FEATURE_LEN
    }

    pub fn state(&self) -> &ExtractorState {
        &self.state
    }

    /// Forget the previous frame
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Run one extraction on an empty observation and check the output width
    ///
    /// The retained state is left untouched.
    pub fn verify(&mut self) -> SignaResult<usize> {
        let saved = mem::take(&mut self.state);
        let dry_run = self.extract(&Observation::default());
        self.state = saved;

        let len = dry_run?.len();
        if len != FEATURE_LEN {
            return Err(SignaError::FeatureLength {
                expected: FEATURE_LEN,
                actual: len,
            });
        }
        Ok(len)
    }

    /// Extract features and advance the retained state
    ///
    /// On error the retained state is left as it was.
    pub fn extract(&mut self, observation: &Observation) -> SignaResult<FeatureVector> {
        let left_curr = joint_rows(observation.left_hand.as_ref(), HAND_LANDMARKS, "left hand")?;
        let right_curr = joint_rows(observation.right_hand.as_ref(), HAND_LANDMARKS, "right hand")?;
        let pose_curr = joint_rows(observation.pose.as_ref(), POSE_LANDMARKS, "pose")?;

        let mut features = Vec::with_capacity(FEATURE_LEN);

        push_world_hand(&mut features, observation.left_hand_world.as_ref())?;
        push_world_hand(&mut features, observation.right_hand_world.as_ref())?;
        push_world_arm(&mut features, observation.pose_world.as_ref(), Side::Left)?;
        push_world_arm(&mut features, observation.pose_world.as_ref(), Side::Right)?;

        push_rows(
            &mut features,
            &normalized_displacement(&self.state.left_hand, &left_curr, hand_depth),
        );
        push_rows(
            &mut features,
            &normalized_displacement(&self.state.right_hand, &right_curr, hand_depth),
        );

        let pose_displacement = normalized_displacement(&self.state.pose, &pose_curr, pose_depth);
        for side in [Side::Left, Side::Right] {
            for idx in side.arm_indexes() {
                features.extend_from_slice(&pose_displacement[idx]);
            }
        }

        let rotations = self.solver.compute(&pose_curr, &left_curr, &right_curr)?;
        if rotations.len() < MIN_ROTATION_ROWS {
            return Err(SignaError::SolverOutput {
                expected: MIN_ROTATION_ROWS,
                actual: rotations.len(),
            });
        }
        for side in [Side::Left, Side::Right] {
            for row in &rotations[side.chain_rows()] {
                features.extend_from_slice(row);
            }
        }

        if features.len() != FEATURE_LEN {
            return Err(SignaError::FeatureLength {
                expected: FEATURE_LEN,
                actual: features.len(),
            });
        }

        // Only a fully extracted frame becomes the previous frame
        self.state = ExtractorState {
            left_hand: left_curr,
            right_hand: right_curr,
            pose: pose_curr,
        };

        tracing::trace!(
            timestamp = observation.timestamp.as_millis(),
            hands = observation.has_hands(),
            pose = observation.has_pose(),
            "features extracted"
        );
        Ok(FeatureVector(features))
    }
}

impl std::fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn check_count(set: &LandmarkSet, expected: usize, structure: &'static str) -> SignaResult<()> {
    if set.len() != expected {
        return Err(SignaError::LandmarkCount {
            structure,
            expected,
            actual: set.len(),
        });
    }
    Ok(())
}

fn joint_rows(
    set: Option<&LandmarkSet>,
    expected: usize,
    structure: &'static str,
) -> SignaResult<JointRows> {
    match set {
        Some(set) => {
            check_count(set, expected, structure)?;
            Ok(set.rows())
        }
        None => Ok(sentinel(expected)),
    }
}

fn push_rows(features: &mut Vec<f32>, rows: &[[f32; 3]]) {
    for row in rows {
        features.extend_from_slice(row);
    }
}

fn push_world_hand(features: &mut Vec<f32>, hand: Option<&LandmarkSet>) -> SignaResult<()> {
    match hand {
        Some(hand) => {
            check_count(hand, HAND_LANDMARKS, "hand world")?;
            push_rows(features, &hand.rows());
        }
        None => push_rows(features, &sentinel(HAND_LANDMARKS)),
    }
    Ok(())
}

fn push_world_arm(
    features: &mut Vec<f32>,
    pose: Option<&LandmarkSet>,
    side: Side,
) -> SignaResult<()> {
    let indexes = side.arm_indexes();
    let Some(pose) = pose else {
        push_rows(features, &sentinel(indexes.len()));
        return Ok(());
    };

    check_count(pose, POSE_LANDMARKS, "pose world")?;
    for idx in indexes {
        if let Some(lm) = pose.get(idx) {
            features.extend_from_slice(&lm.to_array());
        }
    }
    Ok(())
}
