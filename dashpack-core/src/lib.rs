//! Core library for turning a multi-track Matroska file into a DASH package
//! using ffprobe, ffmpeg and shaka packager.
//!
//! This crate probes the input, transcodes every supported stream into its
//! own rendition, records the successful conversions, and hands them to the
//! packager to produce segmented output plus an MPD.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use dashpack_core::{CoreConfig, process_file};
//! use dashpack_core::events::EventDispatcher;
//! use dashpack_core::external::StdProcessRunner;
//! use std::path::{Path, PathBuf};
//!
//! let config = CoreConfig::new(PathBuf::from("/srv/dashpack")).with_env_overrides();
//! config.validate().unwrap();
//!
//! let dispatcher = EventDispatcher::new();
//! let result = process_file(
//!     &StdProcessRunner,
//!     &config,
//!     Path::new("/media/movie.mkv"),
//!     &dispatcher,
//! );
//! if let Some(dir) = result.output_dir() {
//!     println!("Package written to {}", dir.display());
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod external;
pub mod media;
pub mod packaging;
pub mod pipeline;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, SkipSet};
pub use error::{CoreError, CoreResult};
pub use events::{CallbackHandler, Event, EventDispatcher, EventHandler};
pub use external::{CommandOutput, ProcessRunner, StdProcessRunner};
pub use pipeline::{
    PipelineResult, PipelineState, RunContext, package_from_artifacts, process_file,
};
