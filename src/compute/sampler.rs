//! Frame sampling - downsample one frame onto the target grid.

use super::{Region, RegionError, Symbol, average_region, nearest_index};
use crate::schema::Palette;
use crate::source::{Frame, Resolution};

/// Maps source frames onto a `width x height` grid of symbols.
///
/// Cell `(x, y)` covers source columns `floor(x * sx)..floor((x + 1) * sx)`
/// and rows `floor(y * sy)..floor((y + 1) * sy)` where `sx`/`sy` are the
/// real-valued source/target ratios. Truncation decides which pixels belong
/// to which cell; there is no rounding.
#[derive(Debug, Clone, Copy)]
pub struct FrameSampler<'p> {
    width: usize,
    height: usize,
    palette: Option<&'p Palette>,
}

impl<'p> FrameSampler<'p> {
    pub fn new(width: usize, height: usize, palette: Option<&'p Palette>) -> Self {
        Self {
            width,
            height,
            palette,
        }
    }

    /// Number of symbols produced per frame.
    #[inline]
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    pub fn palette(&self) -> Option<&'p Palette> {
        self.palette
    }

    /// Source regions for every target cell, row-major (y outer, x inner).
    pub fn regions(&self, source: Resolution) -> impl Iterator<Item = Region> + Clone {
        let x_scale = source.width as f64 / self.width as f64;
        let y_scale = source.height as f64 / self.height as f64;
        let width = self.width;

        (0..self.height).flat_map(move |y| {
            (0..width).map(move |x| {
                Region::new(
                    (x as f64 * x_scale) as usize,
                    (y as f64 * y_scale) as usize,
                    ((x + 1) as f64 * x_scale) as usize,
                    ((y + 1) as f64 * y_scale) as usize,
                )
                .clamped(source.width, source.height)
            })
        })
    }

    /// Lazily sample `frame`, one symbol per cell.
    pub fn symbols(&self, frame: &Frame) -> impl Iterator<Item = Result<Symbol, RegionError>> {
        let palette = self.palette;
        self.regions(frame.resolution()).map(move |region| {
            let color = average_region(frame, region)?;
            Ok(match palette {
                Some(p) => Symbol::Index(nearest_index(p, color)),
                None => Symbol::Color(color),
            })
        })
    }

    /// Sample `frame` into exactly `cells()` symbols.
    pub fn sample(&self, frame: &Frame) -> Result<Vec<Symbol>, RegionError> {
        let mut out = Vec::with_capacity(self.cells());
        for symbol in self.symbols(frame) {
            out.push(symbol?);
        }
        Ok(out)
    }
}
