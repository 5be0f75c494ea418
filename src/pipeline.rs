//! Conversion driver: frame source in, output document out.
//!
//! Frames flow strictly in source order: select, sample, run-length encode,
//! append to the [`GlobalStream`], and finally pack into buckets. With
//! `parallel` set, batches of selected frames are sampled on the rayon pool
//! and appended in their original order.

use std::fmt;

use log::{debug, info};
use rayon::prelude::*;

use crate::compute::{FrameSampler, FrameSelector, GlobalStream, StreamValue, encode, pack};
use crate::error::{Error, Result};
use crate::output::OutputDocument;
use crate::schema::{EncodeSettings, EncoderConfig, Palette};
use crate::source::{Frame, FrameSource};

/// Selected frames sampled per rayon batch, per worker thread.
const FRAMES_PER_THREAD: usize = 4;

/// Statistics from a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Frames pulled from the source.
    pub frames_read: u64,
    /// Frames sampled and appended to the stream.
    pub frames_encoded: u64,
    /// Values in the global stream.
    pub stream_len: usize,
    /// Values per bucket before the remainder rolls over.
    pub bucket_length: usize,
}

impl fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} frames encoded, {} values, bucket size {}",
            self.frames_encoded, self.frames_read, self.stream_len, self.bucket_length
        )
    }
}

/// Result of a full conversion.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub document: OutputDocument,
    pub stats: EncodeStats,
}

/// Converts a frame stream into an [`OutputDocument`].
///
/// Usage:
/// ```ignore
/// let encoder = Encoder::from_config(&config, palette)?;
/// let mut source = FfmpegSource::open("clip.mp4")?;
/// let encoded = encoder.encode(&mut source)?;
/// encoded.document.write_to_path("clip.json")?;
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    settings: EncodeSettings,
    palette: Option<Palette>,
}

impl Encoder {
    pub fn new(settings: EncodeSettings, palette: Option<Palette>) -> Self {
        Self { settings, palette }
    }

    /// Validate `config` and build an encoder.
    pub fn from_config(config: &EncoderConfig, palette: Option<Palette>) -> Result<Self> {
        Ok(Self::new(config.validate()?, palette))
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn sampler(&self) -> FrameSampler<'_> {
        FrameSampler::new(
            self.settings.width,
            self.settings.height,
            self.palette.as_ref(),
        )
    }

    /// Sample and run-length encode a single frame.
    pub fn encode_frame(&self, frame: &Frame) -> Result<Vec<StreamValue>> {
        let symbols = self.sampler().sample(frame)?;
        Ok(encode(&symbols))
    }

    /// Encode every selected frame of `source`, appending to `stream`.
    ///
    /// Fails with [`Error::NoFramesAvailable`] if the source yields nothing.
    pub fn encode_stream<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        stream: &mut GlobalStream,
    ) -> Result<EncodeStats> {
        let total = source.frame_count_hint();
        info!("Video properties:");
        info!("  Resolution: {}", source.resolution());
        if let Some(fps) = source.frame_rate() {
            info!("  FPS: {:.3}", fps);
        }
        if let Some(total) = total {
            info!("  Total frames: {}", total);
        }
        info!(
            "  Target resolution: {}x{}",
            self.settings.width, self.settings.height
        );
        info!("  Frame skip: {}", self.settings.frame_skip);
        info!("  Total frames to save: {}", self.settings.max_frames);
        if let Some(palette) = &self.palette {
            info!("  Using palette with {} colors", palette.len());
        }

        let start_frames = stream.frame_count();
        let mut selected =
            FrameSelector::new(self.settings.frame_skip, self.settings.max_frames).select(source);

        if self.settings.parallel {
            let batch_size = rayon::current_num_threads().max(1) * FRAMES_PER_THREAD;
            let mut batch: Vec<(u64, Frame)> = Vec::with_capacity(batch_size);
            loop {
                batch.clear();
                for item in selected.by_ref().take(batch_size) {
                    batch.push(item?);
                }
                if batch.is_empty() {
                    break;
                }

                // Indexed collect keeps source order.
                let encoded = batch
                    .par_iter()
                    .map(|(_, frame)| self.encode_frame(frame))
                    .collect::<Result<Vec<_>>>()?;

                for ((index, _), values) in batch.iter().zip(&encoded) {
                    stream.append_frame(values);
                    log_progress(*index, total, stream.frame_count() - start_frames);
                }
            }
        } else {
            for item in selected.by_ref() {
                let (index, frame) = item?;
                let values = self.encode_frame(&frame)?;
                stream.append_frame(&values);
                log_progress(index, total, stream.frame_count() - start_frames);
            }
        }

        let frames_read = selected.selector().seen();
        if frames_read == 0 {
            return Err(Error::NoFramesAvailable);
        }

        let frames_encoded = (stream.frame_count() - start_frames) as u64;
        info!("Processed {} frames", frames_encoded);

        Ok(EncodeStats {
            frames_read,
            frames_encoded,
            stream_len: stream.len(),
            bucket_length: 0,
        })
    }

    /// Run the whole conversion and build the output document.
    pub fn encode<S: FrameSource + ?Sized>(&self, source: &mut S) -> Result<Encoded> {
        let mut stream = GlobalStream::new();
        let mut stats = self.encode_stream(source, &mut stream)?;

        let buckets = pack(stream.values(), self.settings.buckets)?;
        stats.bucket_length = buckets.bucket_length();
        info!("Bucket size: {}", stats.bucket_length);

        let document = match self.palette {
            Some(_) => OutputDocument::Palette(buckets),
            None => OutputDocument::Grid {
                width: self.settings.width,
                height: self.settings.height,
                frames: buckets,
            },
        };

        Ok(Encoded { document, stats })
    }
}

fn log_progress(index: u64, total: Option<u64>, saved: usize) {
    match total {
        Some(total) if total > 0 => debug!(
            "Processing: {:.1}% (frame {}/{}) (saved frames {})",
            (index + 1) as f64 / total as f64 * 100.0,
            index + 1,
            total,
            saved
        ),
        _ => debug!("Processing frame {} (saved frames {})", index + 1, saved),
    }
}
