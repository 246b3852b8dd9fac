use bitvec::prelude::*;
use std::fmt;

use crate::spatial::TileId;

/// Fixed-size bitset of tile identities
///
/// Sized to the tile catalog. Tile ids are 0-based, so tile 0 (air) is a
/// regular member. Ids at or beyond the catalog size are never members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitset {
    bits: BitVec,
    catalog_size: usize,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(catalog_size: usize) -> Self {
        Self {
            bits: bitvec![0; catalog_size],
            catalog_size,
        }
    }

    /// Create a bitset containing every tile of the catalog
    pub fn all(catalog_size: usize) -> Self {
        Self {
            bits: bitvec![1; catalog_size],
            catalog_size,
        }
    }

    /// Create a bitset holding exactly one tile
    pub fn singleton(tile: TileId, catalog_size: usize) -> Self {
        let mut bitset = Self::new(catalog_size);
        bitset.insert(tile);
        bitset
    }

    /// Number of tile identities this set can hold
    pub const fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Insert a tile, ignoring ids outside the catalog
    pub fn insert(&mut self, tile: TileId) {
        if tile < self.catalog_size {
            self.bits.set(tile, true);
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: TileId) -> bool {
        self.bits.get(tile).as_deref() == Some(&true)
    }

    /// Intersect this bitset with another in-place
    ///
    /// Returns how many tiles were removed.
    pub fn intersect_with(&mut self, other: &Self) -> usize {
        let before = self.count();
        self.bits &= &other.bits;
        before - self.count()
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Add every tile of another bitset
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// The single member, if the set holds exactly one tile
    pub fn only(&self) -> Option<TileId> {
        if self.count() == 1 {
            self.bits.first_one()
        } else {
            None
        }
    }

    /// The `n`-th member in ascending order
    pub fn nth(&self, n: usize) -> Option<TileId> {
        self.bits.iter_ones().nth(n)
    }

    /// Iterate members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all tile ids as a vector
    pub fn to_vec(&self) -> Vec<TileId> {
        self.iter().collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.iter().map(|tile| tile.to_string()).collect();
        write!(f, "{{{}}}", members.join(","))
    }
}
