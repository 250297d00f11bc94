// dashpack-cli/src/lib.rs
//
// Library portion of the Dashpack CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{CheckArgs, Cli, Commands, ConvertArgs, PackageArgs, ToolArgs};
pub use commands::check::run_check;
pub use commands::convert::run_convert;
pub use commands::package::run_package;
