//! Log center service and its file sinks

pub mod hook;
mod log_center;
pub mod record_format;
pub mod rotating_file;
pub mod sink;

pub use hook::Hook;
pub use log_center::LogCenter;
pub use record_format::JsonRecordFormat;
pub use rotating_file::{RotatingFile, RotationPolicy};
