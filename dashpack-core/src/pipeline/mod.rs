//! Pipeline orchestration.
//!
//! Sequences probing, per-track conversion, manifest recording and packaging
//! for one input file, and reports the final [`PipelineResult`].

pub mod context;
pub mod orchestrator;

pub use context::RunContext;
pub use orchestrator::{
    convert_tracks, package_from_artifacts, process_file, process_file_with_context,
    validate_input,
};

use serde_json::json;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stages of one run. `Error` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Probing,
    Converting,
    RecordingManifest,
    BuildingPackagerCommand,
    Packaging,
    Done,
    Error,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Probing => "probing",
            PipelineState::Converting => "converting",
            PipelineState::RecordingManifest => "recording manifest",
            PipelineState::BuildingPackagerCommand => "building packager command",
            PipelineState::Packaging => "packaging",
            PipelineState::Done => "done",
            PipelineState::Error => "error",
        }
    }

    /// True for the stages whose failures are reported as packaging errors.
    pub fn is_packaging(self) -> bool {
        matches!(
            self,
            PipelineState::BuildingPackagerCommand | PipelineState::Packaging
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final, binary outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Success { output_dir: PathBuf },
    Error { error: String },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    pub fn output_dir(&self) -> Option<&Path> {
        match self {
            PipelineResult::Success { output_dir } => Some(output_dir),
            PipelineResult::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PipelineResult::Success { .. } => None,
            PipelineResult::Error { error } => Some(error),
        }
    }

    /// `{"status": "success", "output_dir": ...}` or `{"error": ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PipelineResult::Success { output_dir } => json!({
                "status": "success",
                "output_dir": output_dir.to_string_lossy(),
            }),
            PipelineResult::Error { error } => json!({ "error": error }),
        }
    }
}
