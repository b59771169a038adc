//! Depth-normalized displacement between consecutive frames
//!
//! Both frames are divided by their own reference depth (wrist z for hands,
//! mid-hip z for the body) so that moving towards or away from the camera
//! does not register as motion. The difference is then scaled to unit length.
//! An all-zero array is the "not detected" sentinel and is never divided.

use signa_core::JointRows;

use crate::{LEFT_HIP, RIGHT_HIP, WRIST};

/// True if every coordinate is exactly zero
pub fn is_sentinel(rows: &[[f32; 3]]) -> bool {
    rows.iter().flatten().all(|v| *v == 0.0)
}

/// All-zero rows
pub fn sentinel(len: usize) -> JointRows {
    vec![[0.0; 3]; len]
}

/// Wrist depth of a hand
pub fn hand_depth(rows: &[[f32; 3]]) -> f32 {
    rows[WRIST][2]
}

/// Mid-hip depth of a body pose
pub fn pose_depth(rows: &[[f32; 3]]) -> f32 {
    (rows[LEFT_HIP][2] + rows[RIGHT_HIP][2]) / 2.0
}

fn normalize_by_depth(rows: &[[f32; 3]], depth: f32) -> JointRows {
    if depth == 0.0 {
        return sentinel(rows.len());
    }
    rows.iter()
        .map(|r| [r[0] / depth, r[1] / depth, r[2] / depth])
        .collect()
}

/// Unit displacement from `prev` to `curr`
///
/// If either side is the sentinel, that sentinel is returned unchanged. A
/// zero difference is returned as-is rather than normalized.
pub fn normalized_displacement(
    prev: &[[f32; 3]],
    curr: &[[f32; 3]],
    depth: fn(&[[f32; 3]]) -> f32,
) -> JointRows {
    if is_sentinel(prev) {
        return prev.to_vec();
    }
    if is_sentinel(curr) {
        return curr.to_vec();
    }

    let prev = normalize_by_depth(prev, depth(prev));
    let curr = normalize_by_depth(curr, depth(curr));

    let mut diff: JointRows = curr
        .iter()
        .zip(prev.iter())
        .map(|(c, p)| [c[0] - p[0], c[1] - p[1], c[2] - p[2]])
        .collect();

    if is_sentinel(&diff) {
        return diff;
    }

    let norm = diff.iter().flatten().map(|v| v * v).sum::<f32>().sqrt();
    for v in diff.iter_mut().flatten() {
        *v /= norm;
    }
    diff
}
