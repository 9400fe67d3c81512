//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod logger;
pub mod sampler;
pub mod status;

pub use logger::logger_task;
pub use sampler::sampler_task;
pub use status::status_task;
