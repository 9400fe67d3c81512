//! Configuration types
//!
//! Board-agnostic description of the memory device and of the bus timing
//! it needs. Serializable with serde when the `serde` feature is enabled.

pub mod geometry;
pub mod timing;

pub use geometry::*;
pub use timing::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete storage configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StorageConfig {
    /// Device layout
    pub geometry: DeviceGeometry,
    /// Bus timing
    pub timings: BusTimings,
}

impl StorageConfig {
    /// Create a configuration from its parts
    pub const fn new(geometry: DeviceGeometry, timings: BusTimings) -> Self {
        Self { geometry, timings }
    }
}
