//! Literal tile-index tables for sample and target grids

use ndarray::Array3;

use crate::io::configuration::{
    DEFAULT_SAMPLE_DIMENSIONS, DEFAULT_SAMPLE_TILES, DEFAULT_TARGET_DIMENSIONS, UNDETERMINED_TILE,
};
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::direction::Topology;
use crate::spatial::grid::{Dimensions, Position, TileId};

/// A fixed-size table of tile indices
///
/// Non-negative entries are tile ids; any negative entry marks an
/// undetermined position. Used both as the sample that rules are learned
/// from and as the starting state of a target grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    tiles: Array3<i32>,
    topology: Topology,
}

impl TileLayout {
    /// Create a layout with every position set to `value`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the dimensions don't fit the topology
    pub fn filled(dimensions: Dimensions, topology: Topology, value: i32) -> Result<Self> {
        dimensions.validate(topology)?;
        Ok(Self {
            tiles: Array3::from_elem(dimensions.shape(), value),
            topology,
        })
    }

    /// Create a layout where every position is undetermined
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the dimensions don't fit the topology
    pub fn undetermined(dimensions: Dimensions, topology: Topology) -> Result<Self> {
        Self::filled(dimensions, topology, UNDETERMINED_TILE)
    }

    /// Wrap an `[x, y, z]`-indexed array
    pub const fn from_array(tiles: Array3<i32>, topology: Topology) -> Self {
        Self { tiles, topology }
    }

    /// Build a planar layout from rows listed top to bottom
    ///
    /// The first row becomes the highest Y. Rows must share one length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` for ragged rows
    pub fn planar_from_rows(rows: &[Vec<i32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "planar layout rows must all have the same length".to_string(),
            });
        }

        let mut layout = Self::undetermined(Dimensions::planar(width, height), Topology::Planar)?;
        for (row_index, row) in rows.iter().enumerate() {
            let y = height - 1 - row_index;
            for (x, &tile) in row.iter().enumerate() {
                layout.set([x, y, 0], tile)?;
            }
        }
        Ok(layout)
    }

    /// The built-in volumetric sample: a single column standing in air
    ///
    /// # Errors
    ///
    /// Returns an error only if the configured constants are inconsistent
    pub fn builtin_sample() -> Result<Self> {
        let [width, height, depth] = DEFAULT_SAMPLE_DIMENSIONS;
        let mut layout =
            Self::filled(Dimensions::new(width, height, depth), Topology::Volumetric, 0)?;
        for &(position, tile) in &DEFAULT_SAMPLE_TILES {
            layout.set(position, tile)?;
        }
        Ok(layout)
    }

    /// The default volumetric target: fully undetermined
    ///
    /// # Errors
    ///
    /// Returns an error only if the configured constants are inconsistent
    pub fn builtin_target() -> Result<Self> {
        let [width, height, depth] = DEFAULT_TARGET_DIMENSIONS;
        Self::undetermined(Dimensions::new(width, height, depth), Topology::Volumetric)
    }

    /// Layout extents
    pub fn dimensions(&self) -> Dimensions {
        let (width, height, depth) = self.tiles.dim();
        Dimensions::new(width, height, depth)
    }

    /// Neighborhood shape the layout is meant for
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Raw entry at a position
    pub fn get(&self, position: Position) -> Option<i32> {
        self.tiles.get(position).copied()
    }

    /// Tile id at a position, `None` when undetermined or out of bounds
    pub fn tile(&self, position: Position) -> Option<TileId> {
        self.get(position)
            .and_then(|value| TileId::try_from(value).ok())
    }

    /// Overwrite one entry
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for a position outside the layout
    pub fn set(&mut self, position: Position, value: i32) -> Result<()> {
        let dimensions = self.dimensions();
        let entry = self
            .tiles
            .get_mut(position)
            .ok_or(AlgorithmError::OutOfBounds {
                position,
                dimensions,
            })?;
        *entry = value;
        Ok(())
    }

    /// Determined positions and their tiles, in scan order
    pub fn determined(&self) -> impl Iterator<Item = (Position, TileId)> + '_ {
        self.tiles
            .indexed_iter()
            .filter_map(|((x, y, z), &value)| {
                TileId::try_from(value).ok().map(|tile| ([x, y, z], tile))
            })
    }

    /// Smallest catalog that covers every tile in the layout
    pub fn catalog_span(&self) -> usize {
        self.determined()
            .map(|(_, tile)| tile + 1)
            .max()
            .unwrap_or(0)
    }
}
