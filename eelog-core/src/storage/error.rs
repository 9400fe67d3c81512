//! Storage errors

use crate::config::GeometryError;
use crate::traits::TransportError;

/// Errors from storage controller operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Device absent, controller busy, or metadata not restored.
    /// Retry later; no data was touched.
    NotReady,
    /// A transaction failed; work done before it is not rolled back
    Io(TransportError),
    /// The device did not acknowledge within the bounded wait
    Timeout,
    /// Metadata could not be read at startup
    Initialization(TransportError),
    /// The configured geometry is inconsistent
    InvalidGeometry(GeometryError),
    /// Address outside the log data region
    InvalidAddress,
}

impl From<TransportError> for StorageError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => StorageError::Timeout,
            other => StorageError::Io(other),
        }
    }
}

impl From<GeometryError> for StorageError {
    fn from(e: GeometryError) -> Self {
        StorageError::InvalidGeometry(e)
    }
}

/// A write that failed part-way
///
/// Chunks before the failing one were physically written and the write
/// cursor already moved past them. `committed` tells the caller where to
/// resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteError {
    /// Bytes of the request that reached the device
    pub committed: usize,
    /// Cause
    pub error: StorageError,
}

impl WriteError {
    pub(crate) const fn rejected(error: StorageError) -> Self {
        Self {
            committed: 0,
            error,
        }
    }
}

impl From<WriteError> for StorageError {
    fn from(e: WriteError) -> Self {
        e.error
    }
}
