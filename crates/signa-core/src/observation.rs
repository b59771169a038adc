//! Observation - the fused per-frame record
//!
//! An observation exists once both detector halves for a frame timestamp have
//! arrived. Any hand or pose field may be absent when its detector found
//! nothing in that frame.

use std::time::Duration;

use crate::{FrameTime, LandmarkSet};

/// Image dimensions and submission timing of a camera frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameMeta {
    pub timestamp: FrameTime,
    pub width: u32,
    pub height: u32,
}

impl FrameMeta {
    pub fn new(timestamp: FrameTime, width: u32, height: u32) -> Self {
        Self {
            timestamp,
            width,
            height,
        }
    }
}

/// Fused landmarks for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub left_hand: Option<LandmarkSet>,
    pub left_hand_world: Option<LandmarkSet>,
    pub right_hand: Option<LandmarkSet>,
    pub right_hand_world: Option<LandmarkSet>,
    pub pose: Option<LandmarkSet>,
    pub pose_world: Option<LandmarkSet>,
    pub timestamp: FrameTime,
    pub image_width: u32,
    pub image_height: u32,
    /// Time between frame submission and pairing of both detector halves
    pub detection_latency: Duration,
}

impl Observation {
    /// An observation with nothing detected
    pub fn empty(timestamp: FrameTime) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    pub fn has_hands(&self) -> bool {
        self.left_hand.is_some() || self.right_hand.is_some()
    }

    pub fn has_pose(&self) -> bool {
        self.pose.is_some()
    }
}
