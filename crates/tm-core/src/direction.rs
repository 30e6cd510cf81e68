//! Migration direction (up or down)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which half of a migration pair a record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward change
    Up,
    /// Rollback of the forward change with the same number
    Down,
}

impl Direction {
    /// Token used in file names and history rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// The other half of the pair
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Exact, case-sensitive match on `up` / `down`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("expected 'up' or 'down', found '{}'", other)),
        }
    }
}
