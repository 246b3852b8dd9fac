//! Error types for rule derivation, generation and file operations

use std::fmt;
use std::path::PathBuf;

use crate::spatial::{Dimensions, Position, TileId};

/// Main error type for all generation operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// A cell's domain would have become empty during propagation
    ///
    /// Fatal to the current run. The cell keeps its previous candidates.
    Contradiction {
        /// Cell whose domain ran out of candidates
        position: Position,
    },

    /// A collapse was forced to a tile the cell had already excluded
    InvalidForcedTile {
        /// Cell that was collapsed
        position: Position,
        /// Requested tile
        tile: TileId,
    },

    /// A position argument lies outside the grid
    OutOfBounds {
        /// Rejected position
        position: Position,
        /// Extents of the grid
        dimensions: Dimensions,
    },

    /// Tile index exceeds the tile catalog
    InvalidTileIndex {
        /// The invalid tile index
        index: usize,
        /// Catalog size
        max_tiles: usize,
    },

    /// Sample or target data doesn't meet requirements
    InvalidSourceData {
        /// Description of what's wrong with the data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Every generation attempt ended in a contradiction
    AttemptsExhausted {
        /// Number of attempts made
        attempts: usize,
        /// Contradiction position of the last attempt
        position: Position,
    },

    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

struct Coordinates(Position);

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "({x}, {y}, {z})")
    }
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contradiction { position } => {
                write!(
                    f,
                    "Contradiction at {}: no candidate tiles remain",
                    Coordinates(*position)
                )
            }
            Self::InvalidForcedTile { position, tile } => {
                write!(
                    f,
                    "Cannot collapse {} to tile {tile}: tile is no longer in its domain",
                    Coordinates(*position)
                )
            }
            Self::OutOfBounds {
                position,
                dimensions,
            } => {
                write!(
                    f,
                    "Position {} is outside the {dimensions} grid",
                    Coordinates(*position)
                )
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(f, "Tile index {index} is out of bounds (max: {max_tiles})")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::AttemptsExhausted { attempts, position } => {
                write!(
                    f,
                    "All {attempts} attempts ended in a contradiction (last at {})",
                    Coordinates(*position)
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
