//! Per-run path layout.
//!
//! A `RunContext` is built once per run and handed to every stage, so no
//! component derives artifact or output locations on its own.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CoreConfig;
use crate::error::CoreResult;

/// Every filesystem location used by one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Timestamp identifying the run; names both per-run directories
    pub run_id: String,
    /// Persisted probe output
    pub probe_path: PathBuf,
    /// Persisted conversion manifest
    pub manifest_path: PathBuf,
    /// Parent of all per-run transcode directories
    pub transcode_root: PathBuf,
    /// Transcode outputs of this run
    pub transcode_dir: PathBuf,
    /// Parent of all per-run package directories
    pub package_root: PathBuf,
    /// Packaged outputs of this run
    pub package_dir: PathBuf,
    /// DASH manifest written by the packager
    pub mpd_path: PathBuf,
}

impl RunContext {
    /// Builds the layout for run `run_id` under `config.work_dir`.
    pub fn new(config: &CoreConfig, run_id: impl Into<String>) -> Self {
        let run_id = run_id.into();
        let work_dir = &config.work_dir;
        let transcode_root = work_dir.join(&config.transcode_dir_name);
        let package_root = work_dir.join(&config.package_dir_name);
        let transcode_dir = transcode_root.join(&run_id);
        let package_dir = package_root.join(&run_id);

        Self {
            probe_path: work_dir.join(&config.probe_file_name),
            manifest_path: work_dir.join(&config.manifest_file_name),
            mpd_path: package_dir.join(&config.mpd_file_name),
            transcode_root,
            transcode_dir,
            package_root,
            package_dir,
            run_id,
        }
    }

    /// Builds the layout for a new run identified by the current local time.
    pub fn for_new_run(config: &CoreConfig) -> Self {
        Self::new(config, crate::utils::run_timestamp())
    }

    /// Creates the per-run transcode and package directories.
    pub fn prepare_directories(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.transcode_dir)?;
        fs::create_dir_all(&self.package_dir)?;
        Ok(())
    }

    /// Output path of stream `index` with the given extension.
    pub fn track_output_path(&self, index: i64, extension: &str) -> PathBuf {
        self.transcode_dir.join(format!("track_{index}.{extension}"))
    }

    /// Maps a transcode-stage path to its packaging-stage path.
    ///
    /// Paths under `transcode_root` keep their relative location beneath
    /// `package_root`. Anything else is placed in `package_dir` by file name.
    pub fn package_path_for(&self, transcode_output: &Path) -> PathBuf {
        match transcode_output.strip_prefix(&self.transcode_root) {
            Ok(relative) => self.package_root.join(relative),
            Err(_) => match transcode_output.file_name() {
                Some(name) => self.package_dir.join(name),
                None => self.package_dir.clone(),
            },
        }
    }
}
