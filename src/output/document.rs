//! The persisted output document.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::compute::Buckets;
use crate::error::Result;

/// Output layout. The two shapes are deliberately asymmetric: palette mode
/// emits the bucket map as the whole document, grid mode nests it under
/// `frames` next to the target dimensions.
///
/// ```text
/// palette: {"f0":"1,4,0,12",...}
/// grid:    {"width":2,"height":2,"frames":{"f0":"0.5,0.5,0.5,4",...}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputDocument {
    Palette(Buckets),
    Grid {
        width: usize,
        height: usize,
        frames: Buckets,
    },
}

impl OutputDocument {
    pub fn buckets(&self) -> &Buckets {
        match self {
            OutputDocument::Palette(b) => b,
            OutputDocument::Grid { frames, .. } => frames,
        }
    }

    pub fn is_palette(&self) -> bool {
        matches!(self, OutputDocument::Palette(_))
    }

    /// Minified JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write minified JSON to `w`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *w, self)?;
        Ok(())
    }

    /// Write minified JSON to a file, returning the file size in bytes.
    ///
    /// The document is written to a temporary file next to `path` and renamed
    /// over it once complete, so a failed write never leaves a truncated file.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            self.write_to(&mut writer)?;
            writer.flush()?;
        }
        let size = file.as_file().metadata()?.len();
        file.persist(path).map_err(|e| e.error)?;
        Ok(size)
    }
}
