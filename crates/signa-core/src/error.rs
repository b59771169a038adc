//! Error types for the Signa pipeline

use thiserror::Error;

use crate::FrameTime;

/// Core Signa errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignaError {
    // Setup errors
    #[error("Label manifest error: {0}")]
    Manifest(String),

    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Delegate unavailable: {0}")]
    DelegateUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Logging initialisation failed: {0}")]
    Logging(String),

    // Feature errors
    #[error("Landmark count mismatch for {structure}: expected {expected}, got {actual}")]
    LandmarkCount {
        structure: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Bone rotation solver failed: {0}")]
    Solver(String),

    #[error("Bone rotation solver returned {actual} rows, need at least {expected}")]
    SolverOutput { expected: usize, actual: usize },

    #[error("Feature length mismatch: expected {expected}, got {actual}")]
    FeatureLength { expected: usize, actual: usize },

    // Window errors
    #[error("Frame {timestamp:?} is older than window tail {tail:?}")]
    NonMonotonicFrame { timestamp: FrameTime, tail: FrameTime },

    #[error("Cannot resample an empty window")]
    EmptyWindow,

    // Classification errors
    #[error("Tensor shape mismatch: expected {expected_frames}x{expected_width}, got {frames}x{width}")]
    TensorShape {
        expected_frames: usize,
        expected_width: usize,
        frames: usize,
        width: usize,
    },

    #[error("Model returned {actual} scores for {expected} labels")]
    ScoreCount { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Classifier session is closed")]
    SessionClosed,

    // Runtime errors
    #[error("Detector failed: {0}")]
    Detector(String),

    #[error("Pipeline worker failed: {0}")]
    Worker(String),
}

/// Result type for Signa operations
pub type SignaResult<T> = Result<T, SignaError>;
