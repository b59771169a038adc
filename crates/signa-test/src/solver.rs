//! Rest-pose bone rotation solver

use signa_core::SignaResult;
use signa_features::{BoneRotationSolver, RotationRow, MIN_ROTATION_ROWS};

/// Identity rotation for every bone, whatever the joints
#[derive(Debug, Clone, Copy)]
pub struct RestPoseSolver {
    bones: usize,
}

impl RestPoseSolver {
    pub fn new(bones: usize) -> Self {
        Self { bones }
    }
}

impl Default for RestPoseSolver {
    fn default() -> Self {
        Self::new(MIN_ROTATION_ROWS)
    }
}

impl BoneRotationSolver for RestPoseSolver {
    fn compute(
        &self,
        _pose: &[[f32; 3]],
        _left_hand: &[[f32; 3]],
        _right_hand: &[[f32; 3]],
    ) -> SignaResult<Vec<RotationRow>> {
        Ok(vec![[1.0, 0.0, 0.0, 0.0]; self.bones])
    }
}
