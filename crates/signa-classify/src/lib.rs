//! Signa Classify - from a resampled window to a stable gesture label
//!
//! - `LabelManifest`: ordered label names loaded once at setup
//! - `GestureModel` / `ModelLoader`: the inference runtime, behind traits
//! - `ClassifierSession`: a loaded model plus its labels, serialized by the caller
//! - `PredictionStabilizer`: confidence threshold and minimum-hold debounce

pub mod labels;
pub mod model;
pub mod session;
pub mod stabilizer;

pub use labels::*;
pub use model::*;
pub use session::*;
pub use stabilizer::*;
