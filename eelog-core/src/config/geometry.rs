//! Device geometry
//!
//! Describes how the memory device is laid out: how big it is, how large
//! a page is, and where the persisted cursor record ends and the log data
//! begins.
//!
//! ```text
//! 0        metadata_addr      data_start                     total_size
//! ├────────┼──────────────────┼──────────────────────────────┤
//! │        │ cursor record    │ log data (ring)              │
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::storage::metadata::RECORD_LEN;

/// Largest page size supported (bounds the erase fill buffer)
pub const MAX_PAGE_SIZE: usize = 256;

/// Largest device addressable with a 16-bit memory address
pub const MAX_DEVICE_SIZE: u32 = 65_536;

/// Errors from geometry validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Page size is zero
    ZeroPageSize,
    /// Page size exceeds [`MAX_PAGE_SIZE`]
    PageTooLarge,
    /// Total size exceeds 16-bit addressing
    DeviceTooLarge,
    /// Total size is not a whole number of pages
    PartialPage,
    /// Metadata region cannot hold the cursor record
    MetadataTooSmall,
    /// Metadata region runs into the data region
    MetadataOverlapsData,
    /// Data region is empty or starts past the end of the device
    NoDataRegion,
}

/// Immutable layout of the memory device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceGeometry {
    /// Total addressable bytes
    pub total_size: u32,
    /// Bytes per physical page (largest atomic write)
    pub page_size: u16,
    /// Address of the persisted cursor record
    pub metadata_addr: u16,
    /// Bytes reserved for the cursor record
    pub metadata_len: u16,
    /// First address of the log data region
    pub data_start: u16,
}

impl Default for DeviceGeometry {
    fn default() -> Self {
        Self::M24FC256
    }
}

impl DeviceGeometry {
    /// Microchip 24FC256: 32 KiB, 64-byte pages, 6-byte extended record
    pub const M24FC256: Self = Self {
        total_size: 32_768,
        page_size: 64,
        metadata_addr: 0x0000,
        metadata_len: 6,
        data_start: 0x0006,
    };

    /// Create a validated geometry
    pub fn new(
        total_size: u32,
        page_size: u16,
        metadata_addr: u16,
        metadata_len: u16,
        data_start: u16,
    ) -> Result<Self, GeometryError> {
        let geometry = Self {
            total_size,
            page_size,
            metadata_addr,
            metadata_len,
            data_start,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check the layout invariants
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.page_size == 0 {
            return Err(GeometryError::ZeroPageSize);
        }
        if self.page_size as usize > MAX_PAGE_SIZE {
            return Err(GeometryError::PageTooLarge);
        }
        if self.total_size > MAX_DEVICE_SIZE {
            return Err(GeometryError::DeviceTooLarge);
        }
        if self.total_size % self.page_size as u32 != 0 {
            return Err(GeometryError::PartialPage);
        }
        if (self.metadata_len as usize) < RECORD_LEN {
            return Err(GeometryError::MetadataTooSmall);
        }
        if self.metadata_end() > self.data_start as u32 {
            return Err(GeometryError::MetadataOverlapsData);
        }
        if self.data_start as u32 >= self.total_size {
            return Err(GeometryError::NoDataRegion);
        }
        Ok(())
    }

    /// Bytes available to the log
    pub const fn usable_size(&self) -> u32 {
        self.total_size - self.data_start as u32
    }

    /// One past the last byte of the metadata region
    pub const fn metadata_end(&self) -> u32 {
        self.metadata_addr as u32 + self.metadata_len as u32
    }

    /// Whether `address` lies inside the log data region
    pub const fn in_data_region(&self, address: u32) -> bool {
        address >= self.data_start as u32 && address < self.total_size
    }
}
