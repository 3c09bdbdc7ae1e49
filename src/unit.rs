#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::Error;

/// Physical [Unit] of a group of partial derivatives.
/// A single [Unit] applies to all columns contributed by one provider.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Unit {
    /// Ratio of two quantities of the same dimension
    /// (for example, line of sight unit vector components).
    #[default]
    Dimensionless,
    /// Meters
    Meter,
    /// Meters per second
    MeterPerSecond,
    /// Seconds
    Second,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Dimensionless => write!(fmt, "dimensionless"),
            Self::Meter => write!(fmt, "meter"),
            Self::MeterPerSecond => write!(fmt, "meter_per_second"),
            Self::Second => write!(fmt, "second"),
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dimensionless" => Ok(Self::Dimensionless),
            "meter" | "m" => Ok(Self::Meter),
            "meter_per_second" | "m/s" => Ok(Self::MeterPerSecond),
            "second" | "s" => Ok(Self::Second),
            _ => Err(Error::UnknownUnit(s.to_string())),
        }
    }
}
