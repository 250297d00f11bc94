//! Per-track conversion.
//!
//! This module groups the stages between probing and packaging: deciding what
//! to do with each stream, running the transcode, and recording the results.

/// Skip/convert/unsupported decisions per stream
pub mod classify;

/// ffmpeg invocation per conversion job
pub mod transcode;

/// Conversion manifest model and persistence
pub mod manifest;

pub use classify::{Classification, ConversionJob, TrackKind, classify_stream};
pub use manifest::{ConversionManifest, ConversionOutcome};
pub use transcode::{TrackOutcome, convert_track, transcode_args};
