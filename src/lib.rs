//! vid2json - Downsampled, run-length encoded video frames as JSON.
//!
//! Every frame of a video is averaged down onto a small target grid, each
//! cell optionally snapped to the nearest color of a fixed palette, and the
//! resulting cell sequence run-length encoded. The encoded frames are
//! concatenated and split into a fixed number of comma-joined text buckets.
//!
//! # Architecture
//!
//! - `source`: Frame sources (in-memory, raw video files, `ffmpeg`)
//! - `schema`: Encoder configuration and palettes
//! - `compute`: Region averaging, quantization, sampling, RLE, selection, bucketing
//! - `output`: The serialized document
//! - `pipeline`: The driver that ties them together
//!
//! # Example
//!
//! ```rust,no_run
//! use vid2json::{
//!     pipeline::Encoder,
//!     schema::{EncoderConfig, Palette},
//!     source::FfmpegSource,
//! };
//!
//! let config = EncoderConfig {
//!     width: 32,
//!     height: 24,
//!     frame_skip: 1,
//!     buckets: 4,
//!     ..Default::default()
//! };
//! let palette = Palette::load("palette.json")?;
//!
//! let encoder = Encoder::from_config(&config, Some(palette))?;
//! let mut source = FfmpegSource::open("clip.mp4")?;
//! let encoded = encoder.encode(&mut source)?;
//!
//! encoded.document.write_to_path("clip.json")?;
//! println!("{}", encoded.stats);
//! # Ok::<(), vid2json::Error>(())
//! ```

pub mod compute;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use compute::{Color, FrameSampler, FrameSelector, GlobalStream, StreamValue, Symbol};
pub use error::{Error, Result};
pub use output::OutputDocument;
pub use pipeline::{EncodeStats, Encoded, Encoder};
pub use schema::{EncoderConfig, Palette};
pub use source::{ChannelOrder, FfmpegSource, Frame, FrameSource, RawVideoSource, Resolution};
