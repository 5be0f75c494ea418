//! Region averaging - reduce a block of source pixels to one color.

use std::fmt;

use super::Color;
use crate::source::{CHANNELS, Frame};

/// Half-open pixel rectangle `[x_start, x_end) x [y_start, y_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x_start: usize,
    pub y_start: usize,
    pub x_end: usize,
    pub y_end: usize,
}

impl Region {
    pub fn new(x_start: usize, y_start: usize, x_end: usize, y_end: usize) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Clamp the end bounds to a `width x height` source.
    pub fn clamped(self, width: usize, height: usize) -> Self {
        Self {
            x_end: self.x_end.min(width),
            y_end: self.y_end.min(height),
            ..self
        }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.x_end.saturating_sub(self.x_start) * self.y_end.saturating_sub(self.y_start)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.x_start, self.x_end, self.y_start, self.y_end
        )
    }
}

/// A sampling block with no pixels in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sampling region {0}: block contains no pixels")]
pub struct RegionError(pub Region);

/// Mean color of `region` in `frame`, normalized to `[0, 1]` and ordered R, G, B.
///
/// End bounds are clamped to the frame. Samples are summed as integers,
/// divided by the pixel count and then by 255, in that order, so identical
/// blocks always produce bit-identical colors.
pub fn average_region(frame: &Frame, region: Region) -> Result<Color, RegionError> {
    let res = frame.resolution();
    let region = region.clamped(res.width, res.height);
    let count = region.area();
    if count == 0 {
        return Err(RegionError(region));
    }

    let mut sums = [0u64; CHANNELS];
    for y in region.y_start..region.y_end {
        for px in frame
            .row_span(y, region.x_start, region.x_end)
            .chunks_exact(CHANNELS)
        {
            sums[0] += px[0] as u64;
            sums[1] += px[1] as u64;
            sums[2] += px[2] as u64;
        }
    }

    let [r, g, b] = frame.channel_order().rgb_offsets();
    let channel = |i: usize| sums[i] as f64 / count as f64 / 255.0;
    Ok(Color::new(channel(r), channel(g), channel(b)))
}
