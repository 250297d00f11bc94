//! Configuration structures and constants for the dashpack-core library.
//!
//! This module provides the configuration system for the pipeline: where the
//! external tools live, where per-run directories and hand-off artifacts are
//! written, which streams are skipped, and the transcode settings per codec.

mod builder;
mod utils;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Container extension accepted as pipeline input (compared case-insensitively).
pub const DEFAULT_CONTAINER_EXTENSION: &str = "mkv";

/// Codec types skipped without conversion: embedded cover art and fonts.
pub const DEFAULT_SKIP_CODEC_TYPES: &[&str] = &["mjpeg", "png", "ttf", "otf"];

/// Default x264 preset for video renditions.
pub const DEFAULT_VIDEO_PRESET: &str = "fast";

/// Default x264 constant rate factor. Range: 0-51, lower is higher quality.
pub const DEFAULT_VIDEO_CRF: u8 = 23;

/// Directory (under the work dir) holding per-run transcode outputs.
pub const DEFAULT_TRANSCODE_DIR_NAME: &str = "uploads";

/// Directory (under the work dir) holding per-run packaged outputs.
pub const DEFAULT_PACKAGE_DIR_NAME: &str = "output";

/// File name of the persisted probe output.
pub const DEFAULT_PROBE_FILE_NAME: &str = "data.json";

/// File name of the persisted conversion manifest.
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "converted.json";

/// File name of the generated DASH manifest.
pub const DEFAULT_MPD_FILE_NAME: &str = "manifest.mpd";

// ============================================================================
// SKIP SET
// ============================================================================

/// Set of codec types that are skipped on purpose (attachments such as cover
/// art and fonts). Skipped streams never reach the converter.
///
/// Entries are stored lowercase; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipSet(BTreeSet<String>);

impl SkipSet {
    pub fn new<I, S>(codec_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codec_types
                .into_iter()
                .map(|s| s.as_ref().trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Parses a comma-separated list such as `"mjpeg,ttf"`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, codec_type: &str) -> bool {
        self.0.contains(&codec_type.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SkipSet {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_CODEC_TYPES.iter().copied())
    }
}

// ============================================================================
// TRANSCODE SETTINGS
// ============================================================================

/// Settings for video renditions.
///
/// The defaults produce H.264 in MP4 with the moov atom moved to the front,
/// which the packager accepts directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSettings {
    pub codec: String,
    pub preset: String,
    pub crf: u8,
    pub pixel_format: String,
    pub profile: String,
    pub level: String,
    pub movflags: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            preset: DEFAULT_VIDEO_PRESET.to_string(),
            crf: DEFAULT_VIDEO_CRF,
            pixel_format: "yuv420p".to_string(),
            profile: "high".to_string(),
            level: "4.0".to_string(),
            movflags: "+faststart".to_string(),
        }
    }
}

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the dashpack-core library.
///
/// All fields have defaults matching the layout the bundled tools expect
/// (`bin/ffprobe`, `bin/ffmpeg`, `bin/packager` relative to the working
/// directory). Use [`CoreConfigBuilder`] for a fluent construction API.
///
/// # Examples
///
/// ```rust
/// use dashpack_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .work_dir(PathBuf::from("/srv/dashpack"))
///     .packager_path(PathBuf::from("/usr/local/bin/packager"))
///     .skip_codec_types(["mjpeg", "ttf"])
///     .video_crf(21)
///     .build();
/// assert_eq!(config.video.crf, 21);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root for hand-off artifacts and per-run directories
    pub work_dir: PathBuf,

    /// Path to the ffprobe executable
    pub ffprobe_path: PathBuf,

    /// Path to the ffmpeg executable
    pub ffmpeg_path: PathBuf,

    /// Path to the shaka packager executable
    pub packager_path: PathBuf,

    /// Required input extension, without the leading dot
    pub container_extension: String,

    /// Codec types skipped without conversion
    pub skip_codec_types: SkipSet,

    /// Video rendition settings
    pub video: VideoSettings,

    /// ffmpeg audio encoder for audio renditions
    pub audio_codec: String,

    /// ffmpeg subtitle encoder for text renditions
    pub subtitle_codec: String,

    pub transcode_dir_name: String,
    pub package_dir_name: String,
    pub probe_file_name: String,
    pub manifest_file_name: String,
    pub mpd_file_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            ffprobe_path: PathBuf::from("bin").join("ffprobe"),
            ffmpeg_path: PathBuf::from("bin").join("ffmpeg"),
            packager_path: PathBuf::from("bin").join("packager"),
            container_extension: DEFAULT_CONTAINER_EXTENSION.to_string(),
            skip_codec_types: SkipSet::default(),
            video: VideoSettings::default(),
            audio_codec: "aac".to_string(),
            subtitle_codec: "webvtt".to_string(),
            transcode_dir_name: DEFAULT_TRANSCODE_DIR_NAME.to_string(),
            package_dir_name: DEFAULT_PACKAGE_DIR_NAME.to_string(),
            probe_file_name: DEFAULT_PROBE_FILE_NAME.to_string(),
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
            mpd_file_name: DEFAULT_MPD_FILE_NAME.to_string(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration rooted at `work_dir` with all other fields defaulted.
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            work_dir,
            ..Default::default()
        }
    }

    /// Applies `DASHPACK_*` environment variable overrides.
    ///
    /// Recognised variables: `DASHPACK_WORK_DIR`, `DASHPACK_FFPROBE`,
    /// `DASHPACK_FFMPEG`, `DASHPACK_PACKAGER`, `DASHPACK_SKIP_CODECS`
    /// (comma-separated), `DASHPACK_VIDEO_PRESET` and `DASHPACK_VIDEO_CRF`.
    pub fn with_env_overrides(mut self) -> Self {
        self.work_dir = utils::get_env_path("DASHPACK_WORK_DIR", self.work_dir);
        self.ffprobe_path = utils::get_env_path("DASHPACK_FFPROBE", self.ffprobe_path);
        self.ffmpeg_path = utils::get_env_path("DASHPACK_FFMPEG", self.ffmpeg_path);
        self.packager_path = utils::get_env_path("DASHPACK_PACKAGER", self.packager_path);
        if let Some(list) = utils::get_env_opt("DASHPACK_SKIP_CODECS") {
            self.skip_codec_types = SkipSet::parse(&list);
        }
        self.video.preset = utils::get_env_string("DASHPACK_VIDEO_PRESET", self.video.preset);
        self.video.crf = utils::get_env_u8("DASHPACK_VIDEO_CRF", self.video.crf);
        self
    }

    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, path) in [
            ("ffprobe", &self.ffprobe_path),
            ("ffmpeg", &self.ffmpeg_path),
            ("packager", &self.packager_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(CoreError::Config(format!("{name} path must not be empty")));
            }
        }

        if self.container_extension.trim_start_matches('.').is_empty() {
            return Err(CoreError::Config(
                "container extension must not be empty".to_string(),
            ));
        }

        if self.video.crf > 51 {
            return Err(CoreError::Config(format!(
                "video crf {} is out of range (0-51)",
                self.video.crf
            )));
        }

        if self.transcode_dir_name == self.package_dir_name {
            return Err(CoreError::Config(
                "transcode and package directories must differ".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skip_set_covers_cover_art_and_fonts() {
        let skip = SkipSet::default();
        assert!(skip.contains("mjpeg"));
        assert!(skip.contains("TTF"));
        assert!(skip.contains("png"));
        assert!(!skip.contains("video"));
        assert!(!skip.contains("audio"));
    }

    #[test]
    fn skip_set_parse_ignores_blanks() {
        let skip = SkipSet::parse(" mjpeg, ,ttf,");
        assert_eq!(skip.len(), 2);
        assert_eq!(skip.iter().collect::<Vec<_>>(), vec!["mjpeg", "ttf"]);
    }

    #[test]
    fn default_config_validates() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_crf() {
        let mut config = CoreConfig::default();
        config.video.crf = 60;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn validate_rejects_shared_run_directories() {
        let mut config = CoreConfig::default();
        config.package_dir_name = config.transcode_dir_name.clone();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
