// ============================================================================
// dashpack-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Log Dispatch
//
// The core library logs through the `log` facade. This module installs a
// fern dispatcher that writes every record as
//
//   [YYYY-mm-dd HH:MM:SS] - message
//
// to stdout and, when a log directory is given, to a per-run log file.
// `--verbose` lowers the level from info to debug. When a command prints a
// machine-readable result on stdout, console logging is switched off and
// only the log file (if any) receives records.
//
// AI-ASSISTANT-INFO: fern logger initialization for the CLI

// ---- External crate imports ----
use anyhow::{Context, Result};
use log::LevelFilter;

// ---- Standard library imports ----
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Name of the log file for a run started now.
pub fn log_file_name() -> String {
    format!("dashpack_run_{}.log", get_timestamp())
}

/// Formats one log line.
pub fn format_log_line(timestamp: impl Display, message: impl Display) -> String {
    format!("[{timestamp}] - {message}")
}

/// Installs the global logger.
///
/// `console = false` keeps stdout free for a JSON result. Returns the path of
/// the log file, if one was created.
pub fn init_logging(
    verbose: bool,
    console: bool,
    log_dir: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, _record| {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            out.finish(format_args!("{}", format_log_line(now, message)))
        })
        .level(level);
    if console {
        dispatch = dispatch.chain(std::io::stdout());
    }

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name());
            let file = fern::log_file(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            dispatch = dispatch.chain(file);
            Some(path)
        }
        None => None,
    };

    dispatch.apply().context("Failed to install logger")?;
    log::debug!("Logger initialized with level: {}", level);
    Ok(log_path)
}
