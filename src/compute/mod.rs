//! Compute module - the frame-to-symbol-stream core.
//!
//! Leaves first: region averaging, palette quantization, frame sampling,
//! run-length coding, frame selection and bucket packing.

mod bucket;
mod color;
mod quantize;
mod region;
mod rle;
mod sampler;
mod selector;
mod stream;

pub use bucket::*;
pub use color::*;
pub use quantize::*;
pub use region::*;
pub use rle::{DecodeError, Run, decode, encode, encode_into, encode_runs, expand, split_frames};
pub use sampler::*;
pub use selector::*;
pub use stream::*;
