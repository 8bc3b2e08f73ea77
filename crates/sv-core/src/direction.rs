//! Direction of travel along a line.
//!
//! Every line in the route table has exactly two directions, each backed by
//! its own OSM relation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Which of a line's two relations a vehicle or geometry belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Wire label, as accepted by the `direction` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward  => "forward",
            Direction::Backward => "backward",
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward  => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    /// Only the exact lowercase literals are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward"  => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            other      => Err(CoreError::InvalidDirection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
