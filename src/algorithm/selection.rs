//! Cell collapse and the seeded random source behind it
//!
//! Collapse is the only place randomness enters a run: when the caller does
//! not force a tile, one candidate is drawn uniformly from the cell's domain.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::{Grid, Position, TileId};

/// Seeded random selector for reproducible stochastic choices
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform choice of an index below `len`
    ///
    /// Returns `None` for an empty range. A single option is returned
    /// without drawing from the generator.
    pub fn uniform_index(&mut self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            1 => Some(0),
            _ => Some(self.rng.random_range(0..len)),
        }
    }
}

/// Receives every tile resolved by a collapse
///
/// This is the boundary towards whatever renders or records the grid; it
/// never affects the grid's logical state.
pub trait ResolutionObserver {
    /// Called once per collapse with the chosen tile
    fn tile_resolved(&mut self, position: Position, tile: TileId);
}

impl ResolutionObserver for () {
    fn tile_resolved(&mut self, _position: Position, _tile: TileId) {}
}

impl<T: ResolutionObserver> ResolutionObserver for Option<T> {
    fn tile_resolved(&mut self, position: Position, tile: TileId) {
        if let Some(observer) = self {
            observer.tile_resolved(position, tile);
        }
    }
}

/// Force the cell at `position` to a single tile
///
/// With `forced == None` the tile is drawn uniformly from the current domain.
/// An explicit tile must still be in the domain. On success the domain
/// becomes that single tile, the cell is marked resolved and the observer is
/// notified.
///
/// # Errors
///
/// Returns an error if:
/// - `position` lies outside the grid (`OutOfBounds`)
/// - the domain is empty (`Contradiction`)
/// - the forced tile was already excluded (`InvalidForcedTile`); the domain
///   is left untouched
pub fn collapse<O: ResolutionObserver + ?Sized>(
    grid: &mut Grid,
    position: Position,
    forced: Option<TileId>,
    selector: &mut RandomSelector,
    observer: &mut O,
) -> Result<TileId> {
    let cell = grid.cell_mut(position)?;

    let tile = match forced {
        Some(tile) => {
            if !cell.domain().contains(tile) {
                return Err(AlgorithmError::InvalidForcedTile { position, tile });
            }
            tile
        }
        None => {
            let choice = selector
                .uniform_index(cell.candidate_count())
                .ok_or(AlgorithmError::Contradiction { position })?;
            cell.domain()
                .nth(choice)
                .ok_or(AlgorithmError::Contradiction { position })?
        }
    };

    cell.resolve(tile);
    observer.tile_resolved(position, tile);
    Ok(tile)
}
