//! Travel mode type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0:?} (expected drive, walk, bicycle or transit)")]
pub struct InvalidMode(String);

/// A method of travelling one leg of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Drive,
    Walk,
    Bicycle,
    Transit,
}

impl Mode {
    /// All modes, most sustainable first.
    pub const ALL: [Mode; 4] = [Mode::Walk, Mode::Bicycle, Mode::Transit, Mode::Drive];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Drive => "drive",
            Mode::Walk => "walk",
            Mode::Bicycle => "bicycle",
            Mode::Transit => "transit",
        }
    }

    /// Name the directions API expects in its `mode` parameter.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Mode::Drive => "driving",
            Mode::Walk => "walking",
            Mode::Bicycle => "bicycling",
            Mode::Transit => "transit",
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Drive => "Drive",
            Mode::Walk => "Walk",
            Mode::Bicycle => "Bike",
            Mode::Transit => "Transit",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses canonical names, case-insensitively, plus the API wire names.
impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" | "driving" => Ok(Mode::Drive),
            "walk" | "walking" => Ok(Mode::Walk),
            "bicycle" | "bicycling" => Ok(Mode::Bicycle),
            "transit" => Ok(Mode::Transit),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}
