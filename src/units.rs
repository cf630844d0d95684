use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Power-of-1024 size scales, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Invalid unit: {0}. Choose from 'B', 'kB', 'MB', 'GB', 'TB', 'PB'.")]
    Invalid(String),
}

impl Unit {
    pub const ALL: [Self; 6] = [Self::B, Self::KB, Self::MB, Self::GB, Self::TB, Self::PB];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::KB => "kB",
            Self::MB => "MB",
            Self::GB => "GB",
            Self::TB => "TB",
            Self::PB => "PB",
        }
    }

    pub const fn multiplier(self) -> u64 {
        match self {
            Self::B => 1,
            Self::KB => 1 << 10,
            Self::MB => 1 << 20,
            Self::GB => 1 << 30,
            Self::TB => 1 << 40,
            Self::PB => 1 << 50,
        }
    }

    /// Largest unit whose multiplier does not exceed `bytes`, falling back to B.
    pub fn best_for(bytes: u64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|unit| bytes >= unit.multiplier())
            .unwrap_or(Self::B)
    }

    #[allow(clippy::cast_precision_loss)] // display value only
    pub fn convert(self, bytes: u64) -> f64 {
        bytes as f64 / self.multiplier() as f64
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| UnitError::Invalid(s.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}
