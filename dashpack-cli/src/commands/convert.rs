// dashpack-cli/src/commands/convert.rs
//
// Runs the full conversion and packaging pipeline for one input file.

use crate::cli::ConvertArgs;
use crate::commands::report_result;
use crate::progress::ProgressBarHandler;

use anyhow::Result;
use dashpack_core::events::EventDispatcher;
use dashpack_core::external::StdProcessRunner;
use dashpack_core::process_file;
use log::{debug, info};
use std::sync::Arc;

pub fn run_convert(args: ConvertArgs) -> Result<bool> {
    let config = args.to_config();
    debug!("Configuration: {:?}", config);
    info!("Input file: {}", args.input.display());

    let progress = Arc::new(ProgressBarHandler::new(!args.no_progress));
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(progress.clone());

    let result = process_file(&StdProcessRunner, &config, &args.input, &dispatcher);
    progress.finish();

    Ok(report_result(&result, args.print_result))
}
