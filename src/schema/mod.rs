//! Schema module - Configuration and palette types for a conversion run.

mod config;
mod palette;

pub use config::*;
pub use palette::*;
