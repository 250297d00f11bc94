// ============================================================================
// dashpack-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates every invocation of the external probe, transcode
// and packaging binaries. Components never spawn processes directly; they
// receive a ProcessRunner so tests can substitute a scripted fake.
//
// KEY COMPONENTS:
// - ProcessRunner: Trait for running one external command to completion
// - CommandOutput: Captured exit code, stdout and stderr
// - StdProcessRunner: Implementation backed by std::process::Command
// - check_dependency: Availability check for a tool path
//
// AI-ASSISTANT-INFO: External tool invocation abstraction

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Scripted ProcessRunner for tests (requires the `test-mocks` feature)
#[cfg(feature = "test-mocks")]
pub mod mocks;

// ============================================================================
// PROCESS EXECUTION ABSTRACTION
// ============================================================================

/// Output captured from a completed external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait representing something that can run an external command to completion.
///
/// `run` returns `Err` only when the process could not be started. A process
/// that starts and exits non-zero is reported through `CommandOutput::code`;
/// deciding whether that is fatal belongs to the caller.
pub trait ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Concrete implementation of `ProcessRunner` using `std::process::Command`.
///
/// Blocks until the child exits and captures both output streams.
#[derive(Debug, Clone, Default)]
pub struct StdProcessRunner;

impl ProcessRunner for StdProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> CoreResult<CommandOutput> {
        log::debug!("Running: {} {}", program.display(), format_args_for_log(args));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command_start_error(program.display().to_string(), e))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Joins arguments for logging, quoting the ones containing whitespace.
pub fn format_args_for_log(args: &[String]) -> String {
    args.iter()
        .map(|a| {
            if a.chars().any(char::is_whitespace) {
                format!("\"{a}\"")
            } else {
                a.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the last stderr line, which is where ffmpeg and packager report
/// the actual failure.
pub(crate) fn stderr_summary(output: &CommandOutput) -> String {
    output
        .stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no error output")
        .to_string()
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if an external command is available and executable.
///
/// Runs `program version_arg` with output discarded. Any exit status counts
/// as available; only a failure to start is reported.
pub fn check_dependency(program: &Path, version_arg: &str) -> CoreResult<()> {
    let result = Command::new(program)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", program.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", program.display());
            Err(CoreError::DependencyNotFound(program.display().to_string()))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                program.display(),
                e
            );
            Err(command_start_error(program.display().to_string(), e))
        }
    }
}
