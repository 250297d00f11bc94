//! DASH packaging.
//!
//! Builds the shaka packager invocation from the conversion results and runs it.

pub mod command;
pub mod runner;

pub use command::{
    PackagerCommand, PackagingEntry, StreamRole, UNDETERMINED, build_packager_command,
    stream_label, stream_language,
};
pub use runner::run_packager;
