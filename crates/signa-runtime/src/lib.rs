//! Signa Runtime - wires the stages into a running recognizer
//!
//! Data flows one way:
//!
//! ```text
//! camera -> LatestFrameSlot -> DetectorBridge -> LandmarkCorrelator
//!        -> PipelineWorker queue -> GesturePipeline -> PipelineEvent channel
//! ```
//!
//! Detector threads only enqueue observations. Everything from feature
//! extraction to stabilization runs on the worker thread under the
//! pipeline lock, one observation at a time.

pub mod bridge;
pub mod config;
pub mod events;
pub mod latest;
pub mod lexemes;
pub mod logging;
pub mod pipeline;
pub mod stats;
pub mod worker;

pub use bridge::*;
pub use config::*;
pub use events::*;
pub use latest::*;
pub use lexemes::*;
pub use logging::*;
pub use pipeline::*;
pub use stats::*;
pub use worker::*;
