//! Landmarks - detector output for hands and body pose
//!
//! Landmarks come in two flavours: image-normalized points (x and y in [0, 1]
//! of the frame, z relative depth) and world points (metric, camera-relative).
//! A detector produces both for every structure it finds.

/// Number of landmarks in one detected hand
pub const HAND_LANDMARKS: usize = 21;

/// Number of landmarks in one detected body pose
pub const POSE_LANDMARKS: usize = 33;

/// Joint rows as plain `[x, y, z]` triples
pub type JointRows = Vec<[f32; 3]>;

/// A single 3D landmark
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Ordered landmarks for one anatomical structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn from_rows(rows: &[[f32; 3]]) -> Self {
        Self {
            points: rows.iter().map(|r| Landmark::new(r[0], r[1], r[2])).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn rows(&self) -> JointRows {
        self.points.iter().map(|p| p.to_array()).collect()
    }
}

/// Handedness label as reported by the hand detector
///
/// The detector assumes a mirrored (selfie) image, so its label names the
/// hand as it appears in the mirror, not the signer's anatomical hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse a detector category name ("Left" / "Right", case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("left") {
            Some(Handedness::Left)
        } else if label.eq_ignore_ascii_case("right") {
            Some(Handedness::Right)
        } else {
            None
        }
    }

    /// The anatomical hand for a mirrored label
    pub fn mirrored(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

/// One hand found by the hand detector
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    /// Raw (mirrored) handedness label
    pub handedness: Handedness,
    /// Handedness confidence
    pub score: f32,
    /// Image-normalized landmarks
    pub landmarks: LandmarkSet,
    /// World landmarks
    pub world_landmarks: LandmarkSet,
}

/// Hand detector output for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandResult {
    pub hands: Vec<HandDetection>,
}

impl HandResult {
    pub fn new(hands: Vec<HandDetection>) -> Self {
        Self { hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// One body pose found by the pose detector
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    pub landmarks: LandmarkSet,
    pub world_landmarks: LandmarkSet,
}

/// Pose detector output for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseResult {
    pub poses: Vec<PoseDetection>,
}

impl PoseResult {
    pub fn new(poses: Vec<PoseDetection>) -> Self {
        Self { poses }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Only the first detected pose takes part in recognition
    pub fn primary(&self) -> Option<&PoseDetection> {
        self.poses.first()
    }
}
