//! Configuration utility functions
//!
//! Helpers for reading override values from environment variables.

use std::path::PathBuf;

/// Get a non-empty value from an environment variable
pub fn get_env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get a string value from an environment variable or use the default
pub fn get_env_string(key: &str, default: String) -> String {
    get_env_opt(key).unwrap_or(default)
}

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    get_env_opt(key).map(PathBuf::from).unwrap_or(default)
}

/// Get a u8 value from an environment variable or use the default
pub fn get_env_u8(key: &str, default: u8) -> u8 {
    match get_env_opt(key) {
        Some(val) => val.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value '{}' for {}", val, key);
            default
        }),
        None => default,
    }
}
