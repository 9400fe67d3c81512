//! Controller state flags

/// Whether the device answered the presence probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Presence {
    /// Not probed yet
    #[default]
    Unknown,
    /// Device acknowledged its address
    Present,
    /// Device did not respond within the probe timeout
    NotPresent,
}

/// Operation guard
///
/// The bus carries one transaction at a time, so the controller runs one
/// operation at a time. An operation that finds it `Busy` fails fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationState {
    #[default]
    Idle,
    Busy,
}

impl Presence {
    /// Check if the device can be used
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }
}

impl OperationState {
    /// Check if an operation is in progress
    pub fn is_busy(&self) -> bool {
        matches!(self, OperationState::Busy)
    }
}
