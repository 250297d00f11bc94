// ============================================================================
// dashpack-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for the Dashpack Pipeline
//
// This module defines the error types used throughout the dashpack-core
// library. Variants are split between stage-level failures, which abort a
// pipeline run, and track-level failures, which only drop one rendition.
//
// KEY COMPONENTS:
// - CoreError: Main error enum covering every failure the pipeline reports
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper functions for creating command-related errors
//
// AI-ASSISTANT-INFO: Error handling for the conversion/packaging pipeline

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::PathBuf;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors reported by the dashpack-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Input validation ----
    /// The input path has the wrong extension or does not exist.
    #[error("{0}")]
    InvalidInput(String),

    // ---- Stage-level failures ----
    /// The probe tool failed, produced unparsable output, or its output could
    /// not be persisted.
    #[error("Probe failed: {0}")]
    ProbeFailure(String),

    /// The conversion manifest could not be written or confirmed on disk.
    #[error("Failed to write conversion manifest {}: {reason}", .path.display())]
    ManifestWriteFailure { path: PathBuf, reason: String },

    /// A conversion manifest entry has no probe descriptor with the same index.
    #[error("No stream metadata found for stream index {index}")]
    MissingStreamMetadata { index: i64 },

    /// The packaging tool exited unsuccessfully or could not be started.
    #[error("Packaging failed: {0}")]
    PackagingFailure(String),

    // ---- Track-level failures ----
    /// Transcoding a single stream failed. Never aborts a run.
    #[error("Error converting track {index}: {reason}")]
    TrackConversionFailure { index: i64, reason: String },

    /// A stream has a codec type the converter has no settings for.
    #[error("Unsupported codec type: {codec_type} (stream {index})")]
    UnsupportedCodec { index: i64, codec_type: String },

    // ---- Plumbing ----
    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Command '{cmd}' failed with {}: {stderr}", describe_exit(*.code))]
    CommandFailed {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true for failures that abort a pipeline run.
    pub fn is_stage_level(&self) -> bool {
        !matches!(
            self,
            CoreError::TrackConversionFailure { .. } | CoreError::UnsupportedCodec { .. }
        )
    }
}

/// Result type for dashpack-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Creates a `CoreError::CommandStart` for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Creates a `CoreError::CommandFailed` for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    code: Option<i32>,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        code,
        stderr: stderr.into(),
    }
}

/// Formats an exit code for log and error messages.
pub fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "termination by signal".to_string(),
    }
}
