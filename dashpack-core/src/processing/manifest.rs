// ============================================================================
// dashpack-core/src/processing/manifest.rs
// ============================================================================
//
// CONVERSION RECORDER: Hand-off Record Between Transcode and Packaging
//
// This module collects the successful per-track outcomes of a run and
// persists them as the conversion manifest, a JSON file of the shape
// {"streams": [{"index": <int>, "output_file": <path>}]}.
//
// AI-ASSISTANT-INFO: Conversion manifest model and persistence

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::processing::transcode::TrackOutcome;

// ---- External crate imports ----
use serde::{Deserialize, Serialize};

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// A stream that was transcoded successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Index of the source stream
    pub index: i64,
    /// Transcoded rendition
    pub output_file: PathBuf,
}

/// Ordered list of successful conversions, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionManifest {
    pub streams: Vec<ConversionOutcome>,
}

impl ConversionManifest {
    /// Keeps only the converted outcomes, preserving their order.
    pub fn from_outcomes(outcomes: &[TrackOutcome]) -> Self {
        Self {
            streams: outcomes
                .iter()
                .filter_map(|o| match o {
                    TrackOutcome::Converted(done) => Some(done.clone()),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Writes the manifest to `path` and confirms the file exists afterwards.
    pub fn write(&self, path: &Path) -> CoreResult<()> {
        let failure = |reason: String| CoreError::ManifestWriteFailure {
            path: path.to_path_buf(),
            reason,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| failure(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| failure(e.to_string()))?;
        }
        fs::write(path, json).map_err(|e| failure(e.to_string()))?;

        if !path.exists() {
            return Err(failure("file not found after writing".to_string()));
        }

        log::debug!(
            "Conversion manifest with {} entr{} written to {}",
            self.streams.len(),
            if self.streams.len() == 1 { "y" } else { "ies" },
            path.display()
        );
        Ok(())
    }

    /// Reads a manifest previously written by [`ConversionManifest::write`].
    pub fn load(path: &Path) -> CoreResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn converted(index: i64, file: &str) -> TrackOutcome {
        TrackOutcome::Converted(ConversionOutcome {
            index,
            output_file: PathBuf::from(file),
        })
    }

    #[test]
    fn only_converted_outcomes_are_recorded_in_order() {
        let outcomes = vec![
            converted(0, "track_0.mp4"),
            TrackOutcome::Skipped {
                index: 1,
                codec_type: "mjpeg".into(),
            },
            TrackOutcome::Failed {
                index: 2,
                reason: "exit status 1".to_string(),
            },
            converted(3, "track_3.m4a"),
        ];
        let manifest = ConversionManifest::from_outcomes(&outcomes);
        let indices: Vec<i64> = manifest.streams.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn write_produces_documented_shape() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("converted.json");
        let manifest = ConversionManifest::from_outcomes(&[converted(1, "uploads/r/track_1.m4a")]);
        manifest.write(&path)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["streams"][0]["index"], 1);
        assert_eq!(value["streams"][0]["output_file"], "uploads/r/track_1.m4a");
        assert_eq!(ConversionManifest::load(&path)?, manifest);
        Ok(())
    }

    #[test]
    fn write_into_a_file_path_fails() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x")?;
        let result = ConversionManifest::default().write(&blocker.join("converted.json"));
        assert!(matches!(result, Err(CoreError::ManifestWriteFailure { .. })));
        Ok(())
    }
}
