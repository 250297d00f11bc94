//! Utility functions for timestamps and path handling.
//!
//! General-purpose helpers used throughout the dashpack-core library.

use std::path::Path;

/// Format of run identifiers, e.g. `20240601123045`.
pub const RUN_ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// Returns the current local time formatted as a run identifier.
#[must_use]
pub fn run_timestamp() -> String {
    chrono::Local::now().format(RUN_ID_FORMAT).to_string()
}

/// Checks whether `path` ends in `.ext` (case-insensitive). `ext` may carry a
/// leading dot.
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Formats a path for logs, falling back to the full path when there is no
/// file name component.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_extension(Path::new("movie.MKV"), "mkv"));
        assert!(has_extension(Path::new("/a/b/movie.mkv"), ".mkv"));
        assert!(!has_extension(Path::new("movie.mp4"), "mkv"));
        assert!(!has_extension(Path::new("mkv"), "mkv"));
    }

    #[test]
    fn run_timestamp_has_fourteen_digits() {
        let ts = run_timestamp();
        assert_eq!(ts.len(), 14);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn display_name_prefers_file_name() {
        assert_eq!(display_name(Path::new("/x/y/film.mkv")), "film.mkv");
    }
}
