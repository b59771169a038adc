//! Signa Window - temporal context for the classifier
//!
//! Feature vectors are collected into a rolling window of roughly one second:
//! - `WindowBuffer` appends, evicts past the span, and gates mostly-empty windows
//! - `Resampler` picks a fixed number of evenly spaced rows for the model

pub mod buffer;
pub mod resample;

pub use buffer::*;
pub use resample::*;
