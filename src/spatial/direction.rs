//! Fixed neighbor directions and the topologies that select them

use std::fmt;

/// One of the six axis-aligned neighbor directions
///
/// Y is the vertical axis, so `PositiveY` is "up" and `NegativeY` is "down".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// One step up along Y
    PositiveY,
    /// One step down along Y
    NegativeY,
    /// One step along +X
    PositiveX,
    /// One step along -X
    NegativeX,
    /// One step along +Z
    PositiveZ,
    /// One step along -Z
    NegativeZ,
}

/// Volumetric processing order: up, down, +x, -x, +z, -z
pub const VOLUMETRIC_DIRECTIONS: [Direction; 6] = [
    Direction::PositiveY,
    Direction::NegativeY,
    Direction::PositiveX,
    Direction::NegativeX,
    Direction::PositiveZ,
    Direction::NegativeZ,
];

/// Planar processing order: up, down, +x, -x
pub const PLANAR_DIRECTIONS: [Direction; 4] = [
    Direction::PositiveY,
    Direction::NegativeY,
    Direction::PositiveX,
    Direction::NegativeX,
];

impl Direction {
    /// Unit offset as `[dx, dy, dz]`
    pub const fn offset(self) -> [isize; 3] {
        match self {
            Self::PositiveY => [0, 1, 0],
            Self::NegativeY => [0, -1, 0],
            Self::PositiveX => [1, 0, 0],
            Self::NegativeX => [-1, 0, 0],
            Self::PositiveZ => [0, 0, 1],
            Self::NegativeZ => [0, 0, -1],
        }
    }

    /// The direction pointing back at the origin cell
    pub const fn opposite(self) -> Self {
        match self {
            Self::PositiveY => Self::NegativeY,
            Self::NegativeY => Self::PositiveY,
            Self::PositiveX => Self::NegativeX,
            Self::NegativeX => Self::PositiveX,
            Self::PositiveZ => Self::NegativeZ,
            Self::NegativeZ => Self::PositiveZ,
        }
    }

    /// Short label used in rule dumps
    pub const fn label(self) -> &'static str {
        match self {
            Self::PositiveY => "+y",
            Self::NegativeY => "-y",
            Self::PositiveX => "+x",
            Self::NegativeX => "-x",
            Self::PositiveZ => "+z",
            Self::NegativeZ => "-z",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Neighborhood shape of a grid
///
/// A planar grid is stored with a depth of one along Z and never looks
/// across that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    /// Six neighbors per cell
    #[default]
    Volumetric,
    /// Four neighbors per cell in the X/Y plane
    Planar,
}

impl Topology {
    /// Directions in their fixed processing order
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::Volumetric => &VOLUMETRIC_DIRECTIONS,
            Self::Planar => &PLANAR_DIRECTIONS,
        }
    }

    /// Check whether a direction belongs to this topology
    pub fn contains(self, direction: Direction) -> bool {
        self.directions().contains(&direction)
    }
}
