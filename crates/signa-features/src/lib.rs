//! Signa Feature Extraction
//!
//! Turns one fused observation into a fixed-length feature vector:
//! - Absolute world coordinates of both hands and both arms
//! - Depth-normalized unit displacement of hands and arms since the previous frame
//! - Arm-chain bone rotations from an external rotation solver
//!
//! The previous frame's normalized landmarks are retained in `ExtractorState`.

pub mod displacement;
pub mod extractor;
pub mod layout;
pub mod solver;

pub use displacement::*;
pub use extractor::*;
pub use layout::*;
pub use solver::*;
