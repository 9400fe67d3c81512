//! Temperature sensor implementations

pub mod tmp100;

pub use tmp100::{ConversionMode, Tmp100};
