//! Configuration types for a conversion run.

use serde::{Deserialize, Serialize};

fn default_buckets() -> i64 {
    1
}

/// User-facing encoder configuration.
///
/// Values are signed so that negative input surfaces as a [`ConfigError`]
/// rather than a deserialization failure. Call [`EncoderConfig::validate`] to
/// obtain the checked [`EncodeSettings`] the pipeline runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Target grid width in cells.
    pub width: i64,
    /// Target grid height in cells.
    pub height: i64,
    /// Frames to drop after each sampled frame (0 = keep every frame).
    #[serde(default)]
    pub frame_skip: i64,
    /// Stop after this many sampled frames (0 or negative = unlimited).
    #[serde(default)]
    pub max_frames: i64,
    /// Number of output buckets the encoded stream is split into.
    #[serde(default = "default_buckets")]
    pub buckets: i64,
    /// Sample selected frames on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            frame_skip: 0,
            max_frames: 0,
            buckets: default_buckets(),
            parallel: false,
        }
    }
}

impl EncoderConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<EncodeSettings, ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.frame_skip < 0 {
            return Err(ConfigError::NegativeFrameSkip(self.frame_skip));
        }
        if self.buckets <= 0 {
            return Err(ConfigError::InvalidBucketCount(self.buckets));
        }

        Ok(EncodeSettings {
            width: self.width as usize,
            height: self.height as usize,
            frame_skip: self.frame_skip as u64,
            max_frames: self.max_frames.max(0) as u64,
            buckets: self.buckets as usize,
            parallel: self.parallel,
        })
    }
}

/// Checked settings consumed by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub width: usize,
    pub height: usize,
    pub frame_skip: u64,
    /// 0 = unlimited.
    pub max_frames: u64,
    pub buckets: usize,
    pub parallel: bool,
}

impl EncodeSettings {
    /// Symbols produced per sampled frame.
    #[inline]
    pub fn cells_per_frame(&self) -> usize {
        self.width * self.height
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Width and height must be positive integers (got {width}x{height})")]
    InvalidDimensions { width: i64, height: i64 },
    #[error("Frameskip must be non-negative (got {0})")]
    NegativeFrameSkip(i64),
    #[error("Bucket count must be positive (got {0})")]
    InvalidBucketCount(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = EncoderConfig::default().validate().unwrap();
        assert_eq!(settings.cells_per_frame(), 64 * 48);
        assert_eq!(settings.buckets, 1);
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        for (width, height) in [(0, 10), (10, 0), (-1, 10)] {
            let config = EncoderConfig {
                width,
                height,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_negative_skip() {
        let config = EncoderConfig {
            frame_skip: -1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeFrameSkip(-1))
        ));
    }

    #[test]
    fn test_negative_frame_limit_is_unlimited() {
        let config = EncoderConfig {
            max_frames: -5,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap().max_frames, 0);
    }

    #[test]
    fn test_rejects_bad_bucket_count() {
        let config = EncoderConfig {
            buckets: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBucketCount(0))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: EncoderConfig = serde_json::from_str(r#"{"width":32,"height":24}"#).unwrap();
        assert_eq!(config.frame_skip, 0);
        assert_eq!(config.max_frames, 0);
        assert_eq!(config.buckets, 1);
        assert!(!config.parallel);
    }
}
