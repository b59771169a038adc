//! Feature vector layout
//!
//! Block order (all floats):
//!
//! | block                     | size      |
//! |---------------------------|-----------|
//! | left hand world           | 21 x 3    |
//! | right hand world          | 21 x 3    |
//! | left arm world            | 3 x 3     |
//! | right arm world           | 3 x 3     |
//! | left hand displacement    | 21 x 3    |
//! | right hand displacement   | 21 x 3    |
//! | arm displacement (L, R)   | 6 x 3     |
//! | left arm chain rotations  | 19 x 4    |
//! | right arm chain rotations | 19 x 4    |

use std::ops::Range;

use signa_core::{HAND_LANDMARKS, POSE_LANDMARKS};

/// Coordinates per landmark
pub const COORDS: usize = 3;

/// Floats per hand block
pub const HAND_FLOATS: usize = HAND_LANDMARKS * COORDS;

/// Pose joints forming the left arm: shoulder, elbow, wrist
pub const LEFT_ARM_INDEXES: [usize; 3] = [11, 13, 15];

/// Pose joints forming the right arm: shoulder, elbow, wrist
pub const RIGHT_ARM_INDEXES: [usize; 3] = [12, 14, 16];

/// Floats per arm block
pub const ARM_FLOATS: usize = LEFT_ARM_INDEXES.len() * COORDS;

/// Hand joint used as depth reference
pub const WRIST: usize = 0;

/// Pose joints whose midpoint is the pose depth reference
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Components per solver rotation row
pub const ROTATION_COMPONENTS: usize = 4;

/// Rotation rows per arm kinematic chain
pub const ARM_CHAIN_LEN: usize = 19;

/// First rotation row of the left arm chain
pub const LEFT_CHAIN_START: usize = 3;

/// First rotation row of the right arm chain
pub const RIGHT_CHAIN_START: usize = LEFT_CHAIN_START + ARM_CHAIN_LEN;

/// Minimum number of rows the rotation solver must return
pub const MIN_ROTATION_ROWS: usize = RIGHT_CHAIN_START + ARM_CHAIN_LEN;

const POSE_DISPLACEMENT_FLOATS: usize = 2 * ARM_FLOATS;
const CHAIN_FLOATS: usize = ARM_CHAIN_LEN * ROTATION_COMPONENTS;

/// Length of every feature vector
pub const FEATURE_LEN: usize = 2 * HAND_FLOATS
    + 2 * ARM_FLOATS
    + 2 * HAND_FLOATS
    + POSE_DISPLACEMENT_FLOATS
    + 2 * CHAIN_FLOATS;

const _: () = assert!(POSE_LANDMARKS > RIGHT_HIP);

/// Anatomical side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Pose joint indexes of this side's arm
    pub fn arm_indexes(self) -> [usize; 3] {
        match self {
            Side::Left => LEFT_ARM_INDEXES,
            Side::Right => RIGHT_ARM_INDEXES,
        }
    }

    /// Rotation rows of this side's arm chain
    pub fn chain_rows(self) -> Range<usize> {
        let start = match self {
            Side::Left => LEFT_CHAIN_START,
            Side::Right => RIGHT_CHAIN_START,
        };
        start..start + ARM_CHAIN_LEN
    }
}

/// Offsets of each block inside a feature vector
pub struct FeatureLayout;

impl FeatureLayout {
    pub const fn len() -> usize {
        FEATURE_LEN
    }

    pub fn hand_world(side: Side) -> Range<usize> {
        let start = side.index() * HAND_FLOATS;
        start..start + HAND_FLOATS
    }

    pub fn arm_world(side: Side) -> Range<usize> {
        let start = 2 * HAND_FLOATS + side.index() * ARM_FLOATS;
        start..start + ARM_FLOATS
    }

    pub fn hand_displacement(side: Side) -> Range<usize> {
        let start = 2 * HAND_FLOATS + 2 * ARM_FLOATS + side.index() * HAND_FLOATS;
        start..start + HAND_FLOATS
    }

    pub fn arm_displacement() -> Range<usize> {
        let start = 4 * HAND_FLOATS + 2 * ARM_FLOATS;
        start..start + POSE_DISPLACEMENT_FLOATS
    }

    pub fn chain_rotations(side: Side) -> Range<usize> {
        let start = Self::arm_displacement().end + side.index() * CHAIN_FLOATS;
        start..start + CHAIN_FLOATS
    }

    /// Block checked by the window emptiness gate
    pub fn emptiness_block() -> Range<usize> {
        Self::hand_world(Side::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_len() {
        assert_eq!(FEATURE_LEN, 440);
        assert_eq!(MIN_ROTATION_ROWS, 41);
    }

    #[test]
    fn test_blocks_are_contiguous() {
        let blocks = [
            FeatureLayout::hand_world(Side::Left),
            FeatureLayout::hand_world(Side::Right),
            FeatureLayout::arm_world(Side::Left),
            FeatureLayout::arm_world(Side::Right),
            FeatureLayout::hand_displacement(Side::Left),
            FeatureLayout::hand_displacement(Side::Right),
            FeatureLayout::arm_displacement(),
            FeatureLayout::chain_rotations(Side::Left),
            FeatureLayout::chain_rotations(Side::Right),
        ];

        assert_eq!(blocks[0].start, 0);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(blocks[8].end, FEATURE_LEN);
    }

    #[test]
    fn test_emptiness_block_is_second_hand_block() {
        assert_eq!(FeatureLayout::emptiness_block(), 63..126);
    }

    #[test]
    fn test_chain_rows() {
        assert_eq!(Side::Left.chain_rows(), 3..22);
        assert_eq!(Side::Right.chain_rows(), 22..41);
    }
}
