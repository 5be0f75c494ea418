//! Decode any container/codec `ffmpeg` understands by piping rawvideo out of
//! a child process.

use std::ffi::OsString;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use log::debug;

use super::{ChannelOrder, Frame, FrameSource, Resolution, SourceError, read_frame_bytes};

/// Stream properties reported by `ffprobe`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProbe {
    pub resolution: Resolution,
    pub frame_count: Option<u64>,
    pub frame_rate: Option<f64>,
}

impl VideoProbe {
    /// Run `ffprobe` against the first video stream of `path`.
    pub fn run(path: &Path) -> Result<Self, SourceError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,nb_frames,r_frame_rate",
                "-of",
                "default=noprint_wrappers=1",
            ])
            .arg(path)
            .output()
            .map_err(|e| SourceError::Unavailable(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(SourceError::Unavailable(format!(
                "ffprobe failed for {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Self::parse(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            SourceError::Unavailable(format!("no video stream found in {}", path.display()))
        })
    }

    /// Parse `key=value` lines as printed by `ffprobe -of default`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut width = None;
        let mut height = None;
        let mut frame_count = None;
        let mut frame_rate = None;

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "width" => width = value.parse::<usize>().ok(),
                "height" => height = value.parse::<usize>().ok(),
                "nb_frames" => frame_count = value.parse::<u64>().ok(),
                "r_frame_rate" => frame_rate = parse_rate(value),
                _ => {}
            }
        }

        let resolution = Resolution::new(width?, height?);
        if resolution.area() == 0 {
            return None;
        }
        Some(Self {
            resolution,
            frame_count,
            frame_rate,
        })
    }
}

/// `30000/1001` -> 29.97
fn parse_rate(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => value.parse().ok(),
    }
}

/// Arguments for the `ffmpeg` decoder child.
///
/// Output is pinned to the stream and geometry `ffprobe` reported: the first
/// video stream, stored orientation (no rotation from display metadata),
/// packed `bgr24`.
fn decoder_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-noautorotate", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_owned());
    args.extend(
        [
            "-map",
            "0:v:0",
            "-f",
            "rawvideo",
            "-pix_fmt",
            ChannelOrder::Bgr.pixel_format(),
            "-",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args
}

/// Frames decoded by an `ffmpeg` child process, delivered as `bgr24`.
pub struct FfmpegSource {
    path: PathBuf,
    probe: VideoProbe,
    child: Child,
    stdout: BufReader<ChildStdout>,
    finished: bool,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(SourceError::Unavailable(format!(
                "video file not found: {}",
                path.display()
            )));
        }

        let probe = VideoProbe::run(&path)?;
        debug!("ffprobe {}: {:?}", path.display(), probe);

        let mut child = Command::new("ffmpeg")
            .args(decoder_args(&path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SourceError::Unavailable(format!("failed to run ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::Unavailable("ffmpeg stdout not captured".into()))?;

        Ok(Self {
            path,
            probe,
            child,
            stdout: BufReader::new(stdout),
            finished: false,
        })
    }

    pub fn probe(&self) -> &VideoProbe {
        &self.probe
    }
}

impl FrameSource for FfmpegSource {
    fn resolution(&self) -> Resolution {
        self.probe.resolution
    }

    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Bgr
    }

    fn frame_count_hint(&self) -> Option<u64> {
        self.probe.frame_count
    }

    fn frame_rate(&self) -> Option<f64> {
        self.probe.frame_rate
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.finished {
            return Ok(None);
        }

        let resolution = self.probe.resolution;
        let mut data = vec![0u8; resolution.frame_bytes()];
        if read_frame_bytes(&mut self.stdout, &mut data)? {
            return Frame::new(resolution, ChannelOrder::Bgr, data).map(Some);
        }

        self.finished = true;
        let status = self.child.wait()?;
        if !status.success() {
            return Err(SourceError::Unavailable(format!(
                "ffmpeg exited with {} while decoding {}",
                status,
                self.path.display()
            )));
        }
        Ok(None)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if !self.finished {
            // Stopped early: the decoder may still be blocked on a full pipe.
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
