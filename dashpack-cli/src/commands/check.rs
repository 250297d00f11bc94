// dashpack-cli/src/commands/check.rs
//
// Reports whether the three external tools can be started. Installing them
// is left to the operator.

use crate::cli::CheckArgs;

use anyhow::Result;
use console::style;
use dashpack_core::external::check_dependency;
use std::path::Path;

pub fn run_check(args: CheckArgs) -> Result<bool> {
    let config = args.tools.builder().build();

    let tools: [(&str, &Path, &str); 3] = [
        ("ffprobe", config.ffprobe_path.as_path(), "-version"),
        ("ffmpeg", config.ffmpeg_path.as_path(), "-version"),
        ("packager", config.packager_path.as_path(), "--version"),
    ];

    let mut all_found = true;
    for (name, path, version_arg) in tools {
        match check_dependency(path, version_arg) {
            Ok(()) => println!(
                "  {:<9} {} ({})",
                style(format!("{name}:")).bold(),
                style("ok").green(),
                path.display()
            ),
            Err(e) => {
                all_found = false;
                log::debug!("{name} check failed: {e}");
                println!(
                    "  {:<9} {} ({})",
                    style(format!("{name}:")).bold(),
                    style("not found").red().bold(),
                    path.display()
                );
            }
        }
    }

    Ok(all_found)
}
