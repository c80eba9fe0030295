//! Interface bandwidth in Mbps.
//!
//! The simulator stores bandwidth in a raw unit one thousand times finer than
//! Mbps. Conversion from raw units truncates (integer division), so
//! `Bandwidth::from_raw(b.to_raw()?) == b` holds for every representable value.

use std::fmt;

use serde::Serialize;

/// Number of raw simulator units per Mbps.
pub const RAW_UNITS_PER_MBPS: u64 = 1000;

/// A non-negative bandwidth measured in Mbps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Bandwidth(u64);

impl Bandwidth {
    /// Create a bandwidth from a value in Mbps.
    pub const fn from_mbps(mbps: u64) -> Self {
        Self(mbps)
    }

    /// Create a bandwidth from raw simulator units, truncating to whole Mbps.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw / RAW_UNITS_PER_MBPS)
    }

    /// Returns the value in Mbps.
    pub const fn mbps(self) -> u64 {
        self.0
    }

    /// Returns the value in raw simulator units, or `None` on overflow.
    pub const fn to_raw(self) -> Option<u64> {
        self.0.checked_mul(RAW_UNITS_PER_MBPS)
    }
}

impl From<u64> for Bandwidth {
    fn from(mbps: u64) -> Self {
        Self(mbps)
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
