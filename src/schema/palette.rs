//! Fixed color palettes loaded from JSON.
//!
//! A palette file is an object with a `colours` list of `[r, g, b]` triples,
//! each component normalized to `[0, 1]`:
//!
//! ```json
//! { "colours": [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]] }
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// On-disk palette layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteFile {
    pub colours: Vec<Vec<f64>>,
}

/// An ordered, non-empty, immutable list of colors.
///
/// The index of an entry is its only identity. Entries are stored as `f32`,
/// which is the precision nearest-color search runs at.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colours: Vec<[f32; 3]>,
}

impl Palette {
    pub fn new(colours: Vec<[f32; 3]>) -> Result<Self, PaletteError> {
        if colours.is_empty() {
            return Err(PaletteError::Empty);
        }
        for (index, colour) in colours.iter().enumerate() {
            if colour.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(PaletteError::OutOfRange { index });
            }
        }
        Ok(Self { colours })
    }

    /// Build from the deserialized file layout.
    pub fn from_file(file: PaletteFile) -> Result<Self, PaletteError> {
        let colours = file
            .colours
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry.as_slice() {
                &[r, g, b] => Ok([r as f32, g as f32, b as f32]),
                _ => Err(PaletteError::MalformedEntry {
                    index,
                    len: entry.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colours)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PaletteError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    /// Load a palette from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PaletteError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Always false for a constructed palette.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<[f32; 3]> {
        self.colours.get(index).copied()
    }

    pub fn colours(&self) -> &[[f32; 3]] {
        &self.colours
    }

    pub fn to_file(&self) -> PaletteFile {
        PaletteFile {
            colours: self
                .colours
                .iter()
                .map(|c| c.iter().map(|&v| v as f64).collect())
                .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("palette has no colours")]
    Empty,
    #[error("colour {index} has {len} components, expected 3")]
    MalformedEntry { index: usize, len: usize },
    #[error("colour {index} has a component outside [0, 1]")]
    OutOfRange { index: usize },
    #[error("cannot read palette: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse palette: {0}")]
    Json(#[from] serde_json::Error),
}
