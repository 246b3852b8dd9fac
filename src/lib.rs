//! Sample-driven tile grid generation by constraint propagation
//!
//! Adjacency rules are learned from a small sample layout: every tile may
//! only sit next to the tiles it was observed beside. A target grid then
//! starts with every candidate open, and cells are collapsed one by one in
//! scan order while each choice is propagated to the neighbors. Both 3D
//! volumes and planar grids are supported.

#![forbid(unsafe_code)]

/// Rule derivation, propagation, collapse and the generation driver
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Directions, grid storage and literal layouts
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
