#![forbid(unsafe_code)]

//! Orientation and compass-direction enums shared by both layout trees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Flow direction of a container's children.
///
/// `Horizontal` lays children out left to right, `Vertical` top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    /// The other orientation.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// One of the four compass directions.
///
/// Used both for dock placement ("insert north of X") and for the position
/// of a frame relative to the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassDirection {
    North,
    South,
    East,
    West,
}

impl CompassDirection {
    /// All directions in sidebar processing order.
    pub const ALL: [CompassDirection; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// Orientation a container must have to place something in this direction.
    ///
    /// North/south stack vertically, east/west sit side by side.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::North | Self::South => Orientation::Vertical,
            Self::East | Self::West => Orientation::Horizontal,
        }
    }

    /// Whether an element placed in this direction goes before its reference
    /// (west/north) rather than after it (east/south).
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::North | Self::West)
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Direction produced by a before/after relation along an orientation.
    #[must_use]
    pub const fn from_relation(orientation: Orientation, leading: bool) -> Self {
        match (orientation, leading) {
            (Orientation::Horizontal, true) => Self::West,
            (Orientation::Horizontal, false) => Self::East,
            (Orientation::Vertical, true) => Self::North,
            (Orientation::Vertical, false) => Self::South,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for direction names that match none of the four compass values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection {
    pub value: String,
}

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown element position specified: {:?}", self.value)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for CompassDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "top" => Ok(Self::North),
            "south" | "bottom" => Ok(Self::South),
            "east" | "right" => Ok(Self::East),
            "west" | "left" => Ok(Self::West),
            _ => Err(UnknownDirection {
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_orientation_mapping() {
        assert_eq!(CompassDirection::North.orientation(), Orientation::Vertical);
        assert_eq!(CompassDirection::South.orientation(), Orientation::Vertical);
        assert_eq!(CompassDirection::East.orientation(), Orientation::Horizontal);
        assert_eq!(CompassDirection::West.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn leading_directions_insert_before() {
        assert!(CompassDirection::North.is_leading());
        assert!(CompassDirection::West.is_leading());
        assert!(!CompassDirection::South.is_leading());
        assert!(!CompassDirection::East.is_leading());
    }

    #[test]
    fn relation_round_trips_through_orientation() {
        for direction in CompassDirection::ALL {
            let back =
                CompassDirection::from_relation(direction.orientation(), direction.is_leading());
            assert_eq!(back, direction);
        }
    }

    #[test]
    fn parse_accepts_compass_and_side_names() {
        assert_eq!("North".parse(), Ok(CompassDirection::North));
        assert_eq!("left".parse(), Ok(CompassDirection::West));
        let err = "up".parse::<CompassDirection>().expect_err("unknown name");
        assert!(err.to_string().contains("Unknown element position"));
    }
}
