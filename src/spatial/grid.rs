//! Dense cell storage with bounds and neighbor lookup
//!
//! A `Grid` owns every `Cell` of one generation run. Cells only ever lose
//! candidates; mutation goes through the propagation engine, callers get
//! read access for rendering and diagnostics.

use ndarray::Array3;
use std::fmt;

use crate::algorithm::bitset::TileBitset;
use crate::io::configuration::{MAX_GRID_VOLUME, UNDETERMINED_TILE};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::direction::{Direction, Topology};
use crate::spatial::layout::TileLayout;

/// Index of one tile variant in the tile catalog
pub type TileId = usize;

/// Cell coordinates as `[x, y, z]`
pub type Position = [usize; 3];

/// Grid extent along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Extent along X
    pub width: usize,
    /// Extent along Y (the vertical axis)
    pub height: usize,
    /// Extent along Z
    pub depth: usize,
}

impl Dimensions {
    /// Create dimensions from the three extents
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Dimensions of a planar grid (depth of one)
    pub const fn planar(width: usize, height: usize) -> Self {
        Self::new(width, height, 1)
    }

    /// Total number of cells
    pub const fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Check if a position lies inside the grid
    pub const fn contains(&self, position: Position) -> bool {
        position[0] < self.width && position[1] < self.height && position[2] < self.depth
    }

    /// Shape tuple in `[x, y, z]` axis order
    pub const fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// The in-bounds neighbor one step away, if any
    pub fn step(&self, position: Position, direction: Direction) -> Option<Position> {
        let offset = direction.offset();
        let x = position[0].checked_add_signed(offset[0])?;
        let y = position[1].checked_add_signed(offset[1])?;
        let z = position[2].checked_add_signed(offset[2])?;
        let next = [x, y, z];
        self.contains(next).then_some(next)
    }

    /// All positions in scan order: X outermost, then Y, then Z
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let Self {
            width,
            height,
            depth,
        } = *self;
        (0..width).flat_map(move |x| {
            (0..height).flat_map(move |y| (0..depth).map(move |z| [x, y, z]))
        })
    }

    /// Reject a position outside the grid
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if any coordinate exceeds its extent
    pub fn check(&self, position: Position) -> Result<()> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(AlgorithmError::OutOfBounds {
                position,
                dimensions: *self,
            })
        }
    }

    /// Validate the extents for a topology
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a planar grid has a depth other than one
    /// or the volume exceeds the configured maximum
    pub fn validate(&self, topology: Topology) -> Result<()> {
        if topology == Topology::Planar && self.depth != 1 {
            return Err(invalid_parameter(
                "depth",
                &self.depth,
                &"planar grids must have a depth of 1",
            ));
        }

        let volume = self
            .width
            .checked_mul(self.height)
            .and_then(|area| area.checked_mul(self.depth));
        match volume {
            Some(volume) if volume <= MAX_GRID_VOLUME => Ok(()),
            _ => Err(invalid_parameter(
                "dimensions",
                self,
                &format!("grid volume must not exceed {MAX_GRID_VOLUME} cells"),
            )),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// One grid position: its remaining candidates and resolution state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    domain: TileBitset,
    resolved: bool,
    position: Position,
}

impl Cell {
    /// An undetermined cell where every catalog tile is still possible
    pub fn undetermined(position: Position, catalog_size: usize) -> Self {
        Self {
            domain: TileBitset::all(catalog_size),
            resolved: false,
            position,
        }
    }

    /// A cell whose tile is dictated up front
    pub fn preset(position: Position, tile: TileId, catalog_size: usize) -> Self {
        Self {
            domain: TileBitset::singleton(tile, catalog_size),
            resolved: true,
            position,
        }
    }

    /// Tiles still possible at this position
    pub const fn domain(&self) -> &TileBitset {
        &self.domain
    }

    /// True once the cell was explicitly collapsed
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// True when exactly one candidate remains, collapsed or not
    pub fn is_determined(&self) -> bool {
        self.domain.count() == 1
    }

    /// Fixed coordinates of this cell
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Resolved tile, available once the cell has been collapsed
    pub fn tile(&self) -> Option<TileId> {
        if self.resolved {
            self.domain.only()
        } else {
            None
        }
    }

    /// Number of remaining candidates
    pub fn candidate_count(&self) -> usize {
        self.domain.count()
    }

    /// Drop every candidate not in `permitted`
    ///
    /// Returns the number of removed candidates, or `None` without touching
    /// the domain when nothing would remain.
    pub(crate) fn restrict(&mut self, permitted: &TileBitset) -> Option<usize> {
        let narrowed = self.domain.intersection(permitted);
        if narrowed.is_empty() {
            return None;
        }
        let removed = self.domain.count() - narrowed.count();
        self.domain = narrowed;
        Some(removed)
    }

    /// Force the domain to a single tile and mark the cell resolved
    pub(crate) fn resolve(&mut self, tile: TileId) {
        self.domain = TileBitset::singleton(tile, self.domain.catalog_size());
        self.resolved = true;
    }
}

/// Dense 3D (or planar) collection of cells for one generation run
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Array3<Cell>,
    dimensions: Dimensions,
    topology: Topology,
    catalog_size: usize,
}

impl Grid {
    /// Create a grid where every cell starts with the full catalog
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the dimensions don't fit the topology
    pub fn new(dimensions: Dimensions, topology: Topology, catalog_size: usize) -> Result<Self> {
        dimensions.validate(topology)?;
        let cells = Array3::from_shape_fn(dimensions.shape(), |(x, y, z)| {
            Cell::undetermined([x, y, z], catalog_size)
        });

        Ok(Self {
            cells,
            dimensions,
            topology,
            catalog_size,
        })
    }

    /// Create a grid from a literal layout
    ///
    /// Negative entries become undetermined cells, non-negative entries
    /// become resolved presets.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` if a preset lies outside the catalog
    pub fn from_layout(layout: &TileLayout, catalog_size: usize) -> Result<Self> {
        let mut grid = Self::new(layout.dimensions(), layout.topology(), catalog_size)?;
        for (position, tile) in layout.determined() {
            if tile >= catalog_size {
                return Err(AlgorithmError::InvalidTileIndex {
                    index: tile,
                    max_tiles: catalog_size,
                });
            }
            let cell = grid.cell_mut(position)?;
            *cell = Cell::preset(position, tile, catalog_size);
        }
        Ok(grid)
    }

    /// Grid extents
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Neighborhood shape
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of tiles every domain is drawn from
    pub const fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Access a cell
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for a position outside the grid
    pub fn cell(&self, position: Position) -> Result<&Cell> {
        self.dimensions.check(position)?;
        self.cells
            .get(position)
            .ok_or(AlgorithmError::OutOfBounds {
                position,
                dimensions: self.dimensions,
            })
    }

    pub(crate) fn cell_mut(&mut self, position: Position) -> Result<&mut Cell> {
        self.dimensions.check(position)?;
        let dimensions = self.dimensions;
        self.cells
            .get_mut(position)
            .ok_or(AlgorithmError::OutOfBounds {
                position,
                dimensions,
            })
    }

    /// The neighbor in a direction, if it exists in this topology
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        if self.topology.contains(direction) {
            self.dimensions.step(position, direction)
        } else {
            None
        }
    }

    /// All positions in scan order
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        self.dimensions.positions()
    }

    /// All cells in scan order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of explicitly collapsed cells
    pub fn resolved_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_resolved()).count()
    }

    /// True when every cell has been collapsed
    pub fn is_fully_resolved(&self) -> bool {
        self.cells.iter().all(Cell::is_resolved)
    }

    /// Candidate count of every cell, indexed by position
    pub fn domain_sizes(&self) -> Array3<usize> {
        self.cells.map(Cell::candidate_count)
    }

    /// Snapshot of the grid as a literal layout
    ///
    /// Resolved cells keep their tile, every other cell is undetermined.
    pub fn to_layout(&self) -> TileLayout {
        TileLayout::from_array(
            self.cells.map(|cell| {
                cell.tile()
                    .and_then(|tile| i32::try_from(tile).ok())
                    .unwrap_or(UNDETERMINED_TILE)
            }),
            self.topology,
        )
    }
}

impl fmt::Display for Grid {
    /// Prints one block per Y layer, top layer first
    ///
    /// Each row is one Z slice with X running left to right. Determined cells
    /// show their tile in base 36 (`#` past 35), the rest show `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dimensions {
            width,
            height,
            depth,
        } = self.dimensions;

        for y in (0..height).rev() {
            writeln!(f, "layer y={y}")?;
            for z in 0..depth {
                let mut row = String::with_capacity(width);
                for x in 0..width {
                    let symbol = self
                        .cells
                        .get([x, y, z])
                        .and_then(|cell| cell.domain().only())
                        .map_or('?', |tile| {
                            u32::try_from(tile)
                                .ok()
                                .and_then(|digit| char::from_digit(digit, 36))
                                .unwrap_or('#')
                        });
                    row.push(symbol);
                }
                writeln!(f, "{row}")?;
            }
        }
        Ok(())
    }
}
