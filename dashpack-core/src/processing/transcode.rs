// ============================================================================
// dashpack-core/src/processing/transcode.rs
// ============================================================================
//
// TRACK CONVERTER: Per-Stream ffmpeg Invocations
//
// This module builds and runs one ffmpeg invocation per conversion job. Each
// invocation selects exactly one source stream (`-map 0:<index>`) and applies
// the settings for its rendition kind:
//
// - video:    H.264 in MP4, fixed preset/CRF, yuv420p, fixed profile/level,
//             moov atom moved to the front
// - audio:    AAC in M4A
// - subtitle: WebVTT
//
// Failures are track-level: they are reported as a TrackOutcome and never
// returned as errors.
//
// AI-ASSISTANT-INFO: ffmpeg argument building and per-track execution

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, describe_exit};
use crate::external::{ProcessRunner, stderr_summary};
use crate::media::CodecType;
use crate::processing::classify::{ConversionJob, TrackKind};
use crate::processing::manifest::ConversionOutcome;

// ---- Standard library imports ----
use std::path::Path;

/// What happened to one probed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Converted(ConversionOutcome),
    /// Intentionally left out (attachment-like codec type)
    Skipped { index: i64, codec_type: CodecType },
    /// No conversion settings for this codec type
    Unsupported { index: i64, codec_type: CodecType },
    /// The transcode invocation failed to start or exited non-zero
    Failed { index: i64, reason: String },
}

impl TrackOutcome {
    pub fn index(&self) -> i64 {
        match self {
            TrackOutcome::Converted(done) => done.index,
            TrackOutcome::Skipped { index, .. }
            | TrackOutcome::Unsupported { index, .. }
            | TrackOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, TrackOutcome::Converted(_))
    }

    /// The log line reported to the caller for this outcome.
    pub fn log_message(&self) -> String {
        match self {
            TrackOutcome::Converted(done) => {
                format!("Track {} converted successfully.", done.index)
            }
            TrackOutcome::Skipped { index, codec_type } => {
                format!("Skipping {codec_type} stream at index {index}.")
            }
            TrackOutcome::Unsupported { index, codec_type } => CoreError::UnsupportedCodec {
                index: *index,
                codec_type: codec_type.to_string(),
            }
            .to_string(),
            TrackOutcome::Failed { index, reason } => CoreError::TrackConversionFailure {
                index: *index,
                reason: reason.clone(),
            }
            .to_string(),
        }
    }
}

/// Builds the codec-specific output arguments for a rendition kind.
fn codec_args(kind: TrackKind, config: &CoreConfig) -> Vec<String> {
    match kind {
        TrackKind::Video => {
            let video = &config.video;
            vec![
                "-c:v".to_string(),
                video.codec.clone(),
                "-preset".to_string(),
                video.preset.clone(),
                "-crf".to_string(),
                video.crf.to_string(),
                "-pix_fmt".to_string(),
                video.pixel_format.clone(),
                "-profile:v".to_string(),
                video.profile.clone(),
                "-level:v".to_string(),
                video.level.clone(),
                "-movflags".to_string(),
                video.movflags.clone(),
            ]
        }
        TrackKind::Audio => vec!["-c:a".to_string(), config.audio_codec.clone()],
        TrackKind::Subtitle => vec!["-c:s".to_string(), config.subtitle_codec.clone()],
    }
}

/// Builds the full ffmpeg argument list for `job`.
///
/// Returns `None` for codec types the converter has no settings for. The
/// output path is always the last argument.
pub fn transcode_args(input: &Path, job: &ConversionJob, config: &CoreConfig) -> Option<Vec<String>> {
    let kind = TrackKind::from_codec_type(&job.codec_type)?;

    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-map".to_string(),
        format!("0:{}", job.stream_index),
    ];
    args.extend(codec_args(kind, config));
    args.push(job.output_path.to_string_lossy().into_owned());
    Some(args)
}

/// Runs the transcode for one job and reports the outcome.
///
/// Blocks until ffmpeg exits. A spawn failure and a non-zero exit are both
/// reported as `TrackOutcome::Failed`.
pub fn convert_track<R: ProcessRunner>(
    runner: &R,
    config: &CoreConfig,
    input: &Path,
    job: &ConversionJob,
) -> TrackOutcome {
    let Some(args) = transcode_args(input, job, config) else {
        log::debug!(
            "No conversion settings for codec type '{}' (stream {})",
            job.codec_type,
            job.stream_index
        );
        return TrackOutcome::Unsupported {
            index: job.stream_index,
            codec_type: job.codec_type.clone(),
        };
    };

    log::debug!(
        "Converting stream {} ({}) to {}",
        job.stream_index,
        job.codec_type,
        job.output_path.display()
    );

    match runner.run(&config.ffmpeg_path, &args) {
        Ok(output) if output.success() => TrackOutcome::Converted(ConversionOutcome {
            index: job.stream_index,
            output_file: job.output_path.clone(),
        }),
        Ok(output) => {
            let reason = format!(
                "ffmpeg exited with {}: {}",
                describe_exit(output.code),
                stderr_summary(&output)
            );
            log::debug!("Conversion of stream {} failed: {}", job.stream_index, reason);
            TrackOutcome::Failed {
                index: job.stream_index,
                reason,
            }
        }
        Err(e) => {
            log::debug!("Conversion of stream {} could not start: {}", job.stream_index, e);
            TrackOutcome::Failed {
                index: job.stream_index,
                reason: e.to_string(),
            }
        }
    }
}
