//! Hardware abstraction traits
//!
//! These traits define the interface between the log logic and the
//! device drivers that talk to the bus.

pub mod sensor;
pub mod transport;

pub use sensor::{SensorError, TemperatureSensor};
pub use transport::{BlockTransport, TransportError};
