//! Signa Test Harness
//!
//! This crate provides:
//! - Scripted gesture models and loaders with load/close accounting
//! - A rest-pose bone rotation solver
//! - Synthetic hand, pose and observation builders
//! - A seeded harness delivering detector halves out of order from two threads

pub mod harness;
pub mod model;
pub mod solver;
pub mod synthetic;

pub use harness::*;
pub use model::*;
pub use solver::*;
pub use synthetic::*;
