//! Adjacency rules learned from a sample layout
//!
//! For every tile of the catalog and every direction of the topology, the
//! rule table stores which tiles may occupy the neighboring cell. Rules are
//! collected from determined-to-determined adjacencies in the sample; a
//! direction that never saw a neighbor only permits the air tile.

use std::collections::HashMap;
use std::fmt;

use crate::algorithm::bitset::TileBitset;
use crate::io::configuration::AIR_TILE;
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::{Direction, TileId, TileLayout, Topology};

/// Accumulates observed adjacencies before the closed-world default is applied
#[derive(Debug, Clone)]
pub struct RuleTableBuilder {
    catalog_size: usize,
    topology: Topology,
    rules: HashMap<(TileId, Direction), TileBitset>,
}

impl RuleTableBuilder {
    /// Start with an empty rule set for every tile and direction
    pub fn new(catalog_size: usize, topology: Topology) -> Self {
        let mut rules = HashMap::with_capacity(catalog_size * topology.directions().len());
        for tile in 0..catalog_size {
            for &direction in topology.directions() {
                rules.insert((tile, direction), TileBitset::new(catalog_size));
            }
        }

        Self {
            catalog_size,
            topology,
            rules,
        }
    }

    /// Permit `neighbor` next to `tile` in `direction`
    ///
    /// # Errors
    ///
    /// Returns an error if either tile is outside the catalog or the
    /// direction is not part of the topology
    pub fn allow(&mut self, tile: TileId, direction: Direction, neighbor: TileId) -> Result<()> {
        let max_tiles = self.catalog_size;
        if neighbor >= max_tiles {
            return Err(AlgorithmError::InvalidTileIndex {
                index: neighbor,
                max_tiles,
            });
        }
        if !self.topology.contains(direction) {
            return Err(invalid_parameter(
                "direction",
                &direction,
                &"direction is not part of the rule topology",
            ));
        }

        let permitted =
            self.rules
                .get_mut(&(tile, direction))
                .ok_or(AlgorithmError::InvalidTileIndex {
                    index: tile,
                    max_tiles,
                })?;
        permitted.insert(neighbor);
        Ok(())
    }

    /// Record every determined-to-determined adjacency of a sample
    ///
    /// Undetermined positions never act as a source, and an undetermined
    /// neighbor never contributes a permitted tile.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample uses a different topology or holds
    /// tiles outside the catalog
    pub fn observe(&mut self, sample: &TileLayout) -> Result<()> {
        if sample.topology() != self.topology {
            return Err(AlgorithmError::InvalidSourceData {
                reason: format!(
                    "sample topology {:?} does not match rule topology {:?}",
                    sample.topology(),
                    self.topology
                ),
            });
        }

        let dimensions = sample.dimensions();
        for (position, tile) in sample.determined() {
            for &direction in self.topology.directions() {
                let Some(neighbor_position) = dimensions.step(position, direction) else {
                    continue;
                };
                if let Some(neighbor) = sample.tile(neighbor_position) {
                    self.allow(tile, direction, neighbor)?;
                }
            }
        }
        Ok(())
    }

    /// Freeze the rules, permitting only air wherever nothing was observed
    pub fn build(mut self) -> RuleTable {
        for permitted in self.rules.values_mut() {
            if permitted.is_empty() {
                permitted.insert(AIR_TILE);
            }
        }

        RuleTable {
            catalog_size: self.catalog_size,
            topology: self.topology,
            rules: self.rules,
        }
    }
}

/// Immutable `(tile, direction) -> permitted neighbors` mapping
#[derive(Debug, Clone)]
pub struct RuleTable {
    catalog_size: usize,
    topology: Topology,
    rules: HashMap<(TileId, Direction), TileBitset>,
}

impl RuleTable {
    /// Derive rules from a sample layout over a catalog of `catalog_size` tiles
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` if the sample holds a tile outside the catalog
    pub fn from_sample(sample: &TileLayout, catalog_size: usize) -> Result<Self> {
        let span = sample.catalog_span();
        if span > catalog_size {
            return Err(AlgorithmError::InvalidTileIndex {
                index: span - 1,
                max_tiles: catalog_size,
            });
        }

        let mut builder = RuleTableBuilder::new(catalog_size, sample.topology());
        builder.observe(sample)?;
        Ok(builder.build())
    }

    /// Number of tiles covered by the table
    pub const fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Direction set the table was built for
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Tiles permitted next to `tile` in `direction`
    pub fn permitted(&self, tile: TileId, direction: Direction) -> Option<&TileBitset> {
        self.rules.get(&(tile, direction))
    }

    /// Union of the permitted neighbors over every tile of a domain
    pub fn permitted_for(&self, domain: &TileBitset, direction: Direction) -> TileBitset {
        let mut union = TileBitset::new(self.catalog_size);
        for tile in domain.iter() {
            if let Some(permitted) = self.permitted(tile, direction) {
                union.union_with(permitted);
            }
        }
        union
    }

    /// Iterate every entry, ordered by tile then direction
    pub fn entries(&self) -> impl Iterator<Item = (TileId, Direction, &TileBitset)> + '_ {
        (0..self.catalog_size).flat_map(move |tile| {
            self.topology.directions().iter().filter_map(move |&direction| {
                self.permitted(tile, direction)
                    .map(|permitted| (tile, direction, permitted))
            })
        })
    }
}

impl fmt::Display for RuleTable {
    /// One line per tile listing the permitted neighbors of every direction
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in 0..self.catalog_size {
            write!(f, "Tile {tile}: {{")?;
            for (index, &direction) in self.topology.directions().iter().enumerate() {
                let separator = if index == 0 { " " } else { ", " };
                let permitted = self
                    .permitted(tile, direction)
                    .map(TileBitset::to_vec)
                    .unwrap_or_default();
                let listed: Vec<String> = permitted.iter().map(ToString::to_string).collect();
                write!(f, "{separator}{direction}: ({})", listed.join(","))?;
            }
            writeln!(f, " }}")?;
        }
        Ok(())
    }
}
