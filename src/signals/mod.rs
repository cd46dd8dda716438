//! Signal evaluation: heuristic probability scoring.

pub mod scoring;

pub use scoring::*;
