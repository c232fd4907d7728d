// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref WAX_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while resolving paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// A `~` or environment variable could not be expanded.
    #[error("Could not expand path '{path}': {message}")]
    Expansion {
        /// The offending path.
        path: String,
        /// What went wrong.
        message: String,
    },
}

/// Returns the path to the wax configuration directory (`~/.config/wax`).
/// The directory is not created; wax only ever reads from it.
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value.
pub fn get_wax_config_dir() -> Result<PathBuf, PathError> {
    // A poisoned lock still holds a valid path.
    let mut cached_path_guard = WAX_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to the default `config.toml`.
pub fn get_default_config_path() -> Result<PathBuf, PathError> {
    get_wax_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user supplied path,
/// and strips the Windows verbatim prefix when the result is canonicalized.
///
/// # Errors
/// Returns `PathError::Expansion` if a referenced variable is not set.
pub fn expand_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        message: e.to_string(),
    })?;
    let path = PathBuf::from(expanded.into_owned());
    // Paths that do not exist yet (an output file) are kept as typed.
    Ok(dunce::canonicalize(&path).unwrap_or(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_path_ends_with_wax_config() {
        match get_default_config_path() {
            Ok(path) => assert!(path.ends_with("wax/config.toml")),
            Err(e) => assert!(matches!(e, PathError::ConfigDirNotFound)),
        }
    }

    #[test]
    fn test_expand_path_keeps_missing_paths() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("not-yet.xcconfig");
        let expanded = expand_path(missing.to_str().unwrap()).unwrap();
        assert_eq!(expanded.file_name(), missing.file_name());
    }

    #[test]
    fn test_expand_path_reports_unset_variables() {
        let err = expand_path("$WAX_SURELY_UNSET_VARIABLE/config.toml").unwrap_err();
        assert!(matches!(err, PathError::Expansion { .. }));
    }
}
