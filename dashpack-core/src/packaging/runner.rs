//! Packager execution.

use crate::error::{CoreError, CoreResult, describe_exit};
use crate::external::{ProcessRunner, format_args_for_log, stderr_summary};
use crate::packaging::command::PackagerCommand;

/// Runs the packager invocation.
///
/// Success is judged by the exit status alone; the MPD and segments are not
/// checked afterwards.
pub fn run_packager<R: ProcessRunner>(runner: &R, command: &PackagerCommand) -> CoreResult<()> {
    let args = command.args();
    log::debug!(
        "Running packager: {} {}",
        command.program.display(),
        format_args_for_log(&args)
    );

    let output = runner
        .run(&command.program, &args)
        .map_err(|e| CoreError::PackagingFailure(e.to_string()))?;

    if !output.success() {
        return Err(CoreError::PackagingFailure(format!(
            "packager exited with {}: {}",
            describe_exit(output.code),
            stderr_summary(&output)
        )));
    }

    log::info!(
        "Packaged {} rendition(s) into {}",
        command.entries.len(),
        command.mpd_path.display()
    );
    Ok(())
}
