//! Spatial data structures for tile grids
//!
//! This module contains spatial-related functionality including:
//! - Axis-aligned neighbor directions and grid topologies
//! - Cell and grid storage with bounds checking
//! - Literal tile layouts for samples and targets

/// Neighbor directions and their fixed processing order
pub mod direction;
/// Cell domains and the grid that owns them
pub mod grid;
/// Literal tile-index tables
pub mod layout;

pub use direction::{Direction, Topology};
pub use grid::{Cell, Dimensions, Grid, Position, TileId};
pub use layout::TileLayout;
