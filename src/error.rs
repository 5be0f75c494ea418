//! Crate-level error taxonomy.
//!
//! Every failure in a conversion is terminal: the pipeline never retries and
//! never emits a partial document.

use std::io;

use crate::compute::{BucketError, RegionError};
use crate::schema::{ConfigError, PaletteError};
use crate::source::SourceError;

/// Any error that can abort a conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error("Bucketing error: {0}")]
    Bucket(#[from] BucketError),
    #[error("No frames available from source")]
    NoFramesAvailable,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
