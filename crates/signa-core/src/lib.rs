//! Signa Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by every stage of the gesture pipeline:
//! - Frame time (FrameTime)
//! - Landmarks, landmark sets and detector results
//! - Fused per-frame observations
//! - Classifier input tensors
//! - The pipeline-wide error type

pub mod error;
pub mod landmark;
pub mod observation;
pub mod tensor;
pub mod time;

pub use error::*;
pub use landmark::*;
pub use observation::*;
pub use tensor::*;
pub use time::*;
