//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. Every
//! command returns `Ok(true)` on success and `Ok(false)` when it ran but
//! failed, after the failure has already been reported.

/// `convert`: full pipeline for one input file.
pub mod convert;

/// `package`: packaging only, from the artifacts of an earlier run.
pub mod package;

/// `check`: availability of the external tools.
pub mod check;

use dashpack_core::PipelineResult;
use log::info;

/// Prints the final result and converts it into the command status.
pub(crate) fn report_result(result: &PipelineResult, print_result: bool) -> bool {
    if print_result {
        println!("{}", result.to_json());
    }
    match result {
        PipelineResult::Success { output_dir } => {
            info!("Output directory: {}", output_dir.display());
            true
        }
        PipelineResult::Error { .. } => false,
    }
}
