//! Headerless raw video: back-to-back packed frames at a known resolution.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{ChannelOrder, Frame, FrameSource, Resolution, SourceError, read_frame_bytes};

/// Reads frames from any byte stream of concatenated packed frames.
///
/// This is what `ffmpeg -f rawvideo -pix_fmt bgr24 out.raw` produces.
pub struct RawVideoSource<R = BufReader<File>> {
    reader: R,
    resolution: Resolution,
    order: ChannelOrder,
    frame_count: Option<u64>,
}

impl RawVideoSource {
    /// Open a raw video file.
    pub fn open<P: AsRef<Path>>(
        path: P,
        resolution: Resolution,
        order: ChannelOrder,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SourceError::Unavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        let len = file.metadata()?.len();

        let mut source = Self::new(BufReader::new(file), resolution, order);
        source.frame_count = match resolution.frame_bytes() as u64 {
            0 => None,
            frame_bytes => Some(len / frame_bytes),
        };
        Ok(source)
    }
}

impl<R: Read> RawVideoSource<R> {
    pub fn new(reader: R, resolution: Resolution, order: ChannelOrder) -> Self {
        Self {
            reader,
            resolution,
            order,
            frame_count: None,
        }
    }
}

impl<R: Read> FrameSource for RawVideoSource<R> {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    fn frame_count_hint(&self) -> Option<u64> {
        self.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let mut data = vec![0u8; self.resolution.frame_bytes()];
        if !read_frame_bytes(&mut self.reader, &mut data)? {
            return Ok(None);
        }
        Frame::new(self.resolution, self.order, data).map(Some)
    }
}
