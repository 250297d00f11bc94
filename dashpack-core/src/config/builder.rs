// ============================================================================
// dashpack-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating and configuring CoreConfig instances.
// Unset fields keep the defaults from CoreConfig::default().
//
// AI-ASSISTANT-INFO: Builder pattern implementation for CoreConfig

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, SkipSet};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use dashpack_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .work_dir(PathBuf::from("/tmp/run"))
///     .ffmpeg_path(PathBuf::from("/usr/bin/ffmpeg"))
///     .ffprobe_path(PathBuf::from("/usr/bin/ffprobe"))
///     .video_preset("medium")
///     .build();
/// assert_eq!(config.video.preset, "medium");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new builder starting from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory for artifacts and per-run directories.
    pub fn work_dir(mut self, dir: PathBuf) -> Self {
        self.config.work_dir = dir;
        self
    }

    pub fn ffprobe_path(mut self, path: PathBuf) -> Self {
        self.config.ffprobe_path = path;
        self
    }

    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.config.ffmpeg_path = path;
        self
    }

    pub fn packager_path(mut self, path: PathBuf) -> Self {
        self.config.packager_path = path;
        self
    }

    /// Sets the accepted input extension. A leading dot is stripped.
    pub fn container_extension(mut self, ext: &str) -> Self {
        self.config.container_extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Replaces the set of codec types that are skipped without conversion.
    pub fn skip_codec_types<I, S>(mut self, codec_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.skip_codec_types = SkipSet::new(codec_types);
        self
    }

    pub fn video_preset(mut self, preset: &str) -> Self {
        self.config.video.preset = preset.to_string();
        self
    }

    pub fn video_crf(mut self, crf: u8) -> Self {
        self.config.video.crf = crf;
        self
    }

    pub fn audio_codec(mut self, codec: &str) -> Self {
        self.config.audio_codec = codec.to_string();
        self
    }

    pub fn subtitle_codec(mut self, codec: &str) -> Self {
        self.config.subtitle_codec = codec.to_string();
        self
    }

    /// Applies `DASHPACK_*` environment overrides on top of the values set so far.
    pub fn env_overrides(mut self) -> Self {
        self.config = self.config.with_env_overrides();
        self
    }

    /// Builds the final CoreConfig.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
