//! Frame sources - where raw decoded frames come from.
//!
//! The encoder only needs a stream of packed 8-bit, 3-channel frames at a
//! fixed source resolution. Decoding is delegated to whatever implements
//! [`FrameSource`]: an in-memory list, a headerless raw video file, or an
//! `ffmpeg` child process.

mod ffmpeg;
mod raw;

use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

pub use ffmpeg::{FfmpegSource, VideoProbe};
pub use raw::RawVideoSource;

/// Number of samples per pixel.
pub const CHANNELS: usize = 3;

/// Width and height of a frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels.
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Size in bytes of one packed frame at this resolution.
    #[inline]
    pub fn frame_bytes(&self) -> usize {
        self.area() * CHANNELS
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|e| format!("invalid width '{w}': {e}"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|e| format!("invalid height '{h}': {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution must be non-zero, got '{s}'"));
        }
        Ok(Self { width, height })
    }
}

/// Order of the three samples within a stored pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    Rgb,
    /// Blue first, as produced by OpenCV and `ffmpeg -pix_fmt bgr24`.
    #[default]
    Bgr,
}

impl ChannelOrder {
    /// Index of the red, green and blue samples within a stored pixel.
    #[inline]
    pub fn rgb_offsets(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }

    /// Name understood by `ffmpeg -pix_fmt`.
    pub fn pixel_format(self) -> &'static str {
        match self {
            ChannelOrder::Rgb => "rgb24",
            ChannelOrder::Bgr => "bgr24",
        }
    }
}

/// One decoded frame: packed rows of 3-sample pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    resolution: Resolution,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap packed pixel data. The buffer must hold exactly one frame.
    pub fn new(
        resolution: Resolution,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, SourceError> {
        if data.len() != resolution.frame_bytes() {
            return Err(SourceError::FrameSize {
                expected: resolution.frame_bytes(),
                actual: data.len(),
            });
        }
        Ok(Self {
            resolution,
            order,
            data,
        })
    }

    /// A frame where every pixel holds the same stored sample triple.
    pub fn filled(resolution: Resolution, order: ChannelOrder, pixel: [u8; 3]) -> Self {
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(resolution.frame_bytes())
            .collect();
        Self {
            resolution,
            order,
            data,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Stored samples for row `y` between columns `x_start..x_end`.
    #[inline]
    pub fn row_span(&self, y: usize, x_start: usize, x_end: usize) -> &[u8] {
        let row = y * self.resolution.width * CHANNELS;
        &self.data[row + x_start * CHANNELS..row + x_end * CHANNELS]
    }

    /// Stored samples of a single pixel.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let s = self.row_span(y, x, x + 1);
        [s[0], s[1], s[2]]
    }

    /// Overwrite a single pixel with stored samples.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [u8; 3]) {
        let i = (y * self.resolution.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }
}

/// Errors raised while opening or reading a frame source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Frame source unavailable: {0}")]
    Unavailable(String),
    #[error("Frame data truncated: got {got} of {expected} bytes")]
    Truncated { got: usize, expected: usize },
    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
    #[error("I/O error reading frames: {0}")]
    Io(#[from] io::Error),
}

/// A stream of decoded frames at a fixed resolution.
pub trait FrameSource {
    /// Resolution of every frame this source yields.
    fn resolution(&self) -> Resolution;

    /// Stored order of the pixel samples.
    fn channel_order(&self) -> ChannelOrder;

    /// Total number of frames, when the container reports it.
    fn frame_count_hint(&self) -> Option<u64> {
        None
    }

    /// Frames per second, when known.
    fn frame_rate(&self) -> Option<f64> {
        None
    }

    /// Read the next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn resolution(&self) -> Resolution {
        (**self).resolution()
    }

    fn channel_order(&self) -> ChannelOrder {
        (**self).channel_order()
    }

    fn frame_count_hint(&self) -> Option<u64> {
        (**self).frame_count_hint()
    }

    fn frame_rate(&self) -> Option<f64> {
        (**self).frame_rate()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        (**self).next_frame()
    }
}

/// Frames held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    resolution: Resolution,
    order: ChannelOrder,
    frames: std::vec::IntoIter<Frame>,
    total: usize,
}

impl MemorySource {
    /// All frames must share `resolution` and `order`.
    pub fn new(
        resolution: Resolution,
        order: ChannelOrder,
        frames: Vec<Frame>,
    ) -> Result<Self, SourceError> {
        for frame in &frames {
            if frame.resolution() != resolution || frame.channel_order() != order {
                return Err(SourceError::FrameSize {
                    expected: resolution.frame_bytes(),
                    actual: frame.data().len(),
                });
            }
        }
        Ok(Self {
            resolution,
            order,
            total: frames.len(),
            frames: frames.into_iter(),
        })
    }
}

impl FrameSource for MemorySource {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    fn frame_count_hint(&self) -> Option<u64> {
        Some(self.total as u64)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        Ok(self.frames.next())
    }
}

/// Fill `buf` with exactly one frame from `reader`.
///
/// Returns `Ok(false)` on a clean end of stream (no bytes read) and
/// `Truncated` when the stream ends part-way through a frame.
pub(crate) fn read_frame_bytes<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<bool, SourceError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    match filled {
        0 => Ok(false),
        n if n == buf.len() => Ok(true),
        got => Err(SourceError::Truncated {
            got,
            expected: buf.len(),
        }),
    }
}
