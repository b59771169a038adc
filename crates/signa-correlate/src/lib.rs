//! Signa Landmark Correlation
//!
//! The hand and pose detectors run on their own threads and report results for
//! the same camera frame in any order. This crate pairs the two halves by frame
//! timestamp and fuses them into one `Observation`:
//! - Pending-pair table with an atomic insert-or-take operation
//! - Mirror-corrected, confidence-ranked handedness assignment
//! - Observation fusion

pub mod correlator;
pub mod handedness;
pub mod pending;

pub use correlator::*;
pub use handedness::*;
pub use pending::*;
