// dashpack-cli/src/commands/package.rs
//
// Packages the conversion results of an earlier run.

use crate::cli::PackageArgs;
use crate::commands::report_result;

use anyhow::Result;
use dashpack_core::events::EventDispatcher;
use dashpack_core::external::StdProcessRunner;
use dashpack_core::package_from_artifacts;
use log::info;

pub fn run_package(args: PackageArgs) -> Result<bool> {
    let config = args.tools.builder().build();
    info!("Packaging run {}", args.run_id);

    let dispatcher = EventDispatcher::new();
    let result = package_from_artifacts(&StdProcessRunner, &config, &args.run_id, &dispatcher);

    Ok(report_result(&result, args.print_result))
}
