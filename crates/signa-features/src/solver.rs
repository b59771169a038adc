//! Bone rotation solver capability
//!
//! The solver maps joint positions onto a character skeleton and returns one
//! rotation per bone as `[w, x, y, z]`. Its internals (skeleton file, joint
//! mapping) are fixed when it is constructed and are not visible here.

use signa_core::SignaResult;

use crate::ROTATION_COMPONENTS;

/// One bone rotation
pub type RotationRow = [f32; ROTATION_COMPONENTS];

/// Derives per-bone rotations from pose and hand joints
pub trait BoneRotationSolver: Send {
    /// `pose` has 33 rows and each hand 21; absent structures are all-zero
    fn compute(
        &self,
        pose: &[[f32; 3]],
        left_hand: &[[f32; 3]],
        right_hand: &[[f32; 3]],
    ) -> SignaResult<Vec<RotationRow>>;
}

impl<F> BoneRotationSolver for F
where
    F: Fn(&[[f32; 3]], &[[f32; 3]], &[[f32; 3]]) -> SignaResult<Vec<RotationRow>> + Send,
{
    fn compute(
        &self,
        pose: &[[f32; 3]],
        left_hand: &[[f32; 3]],
        right_hand: &[[f32; 3]],
    ) -> SignaResult<Vec<RotationRow>> {
        self(pose, left_hand, right_hand)
    }
}
