//! # Config Loader
//!
//! Reads the optional user configuration file. The file can set the analyzer
//! variable prefix and the syntax mode, and can extend the built-in tables:
//!
//! ```toml
//! prefix = "ACME"
//! syntax = "modern"
//!
//! [tables]
//! ignored_options = ["CLANG_WARN_DOCUMENTATION_COMMENTS"]
//! ignored_checkers = ["alpha.core.CastSize"]
//!
//! [tables.strict]
//! GCC_WARN_UNUSED_PARAMETER = "YES"
//! ```
//!
//! Values from the command line win over values from the file.

use crate::core::paths;
use crate::core::tables::Tables;
use crate::models::SyntaxChoice;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the user configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Io {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid for the expected schema.
    #[error("Could not parse config file '{path}': {source}")]
    TomlParse {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },
}

/// Additions to the built-in tables. Entries are merged, never removed.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TableExtensions {
    /// Extra settings to leave out.
    #[serde(default)]
    pub ignored_options: Vec<String>,
    /// Extra analyzer checkers to leave out.
    #[serde(default)]
    pub ignored_checkers: Vec<String>,
    /// Extra values for the `strict` style.
    #[serde(default)]
    pub strict: BTreeMap<String, String>,
    /// Extra values for the `aggressive` style.
    #[serde(default)]
    pub aggressive: BTreeMap<String, String>,
    /// Extra or replaced category labels.
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
}

/// The contents of `config.toml`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Prefix of the analyzer checker variable.
    pub prefix: Option<String>,
    /// Syntax of the analyzer checker variable.
    pub syntax: Option<SyntaxChoice>,
    /// Additions to the built-in tables.
    #[serde(default)]
    pub tables: TableExtensions,
}

impl UserConfig {
    /// Returns the built-in tables extended with the user's entries.
    /// A user entry replaces a built-in entry with the same key.
    pub fn build_tables(&self) -> Tables {
        let mut tables = Tables::default();
        let ext = &self.tables;

        tables
            .catalog
            .ignored_options
            .extend(ext.ignored_options.iter().cloned());
        tables
            .checkers
            .ignored_checkers
            .extend(ext.ignored_checkers.iter().cloned());
        tables.overrides.strict.extend(ext.strict.clone());
        tables.overrides.aggressive.extend(ext.aggressive.clone());
        tables.display_names.extend(ext.display_names.clone());
        tables
    }
}

/// Parses a config file at `path`.
pub fn load_config_file(path: &Path) -> Result<UserConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the user configuration.
///
/// An explicit path must exist. Without one, the default location is tried and
/// a missing file yields the empty configuration.
pub fn load_user_config(explicit: Option<&Path>) -> Result<UserConfig, ConfigError> {
    if let Some(path) = explicit {
        log::debug!("Loading config from explicit path '{}'.", path.display());
        return load_config_file(path);
    }

    let default_path = match paths::get_default_config_path() {
        Ok(path) => path,
        Err(e) => {
            log::warn!("{}. Using built-in settings.", e);
            return Ok(UserConfig::default());
        }
    };
    if !default_path.is_file() {
        log::debug!(
            "No config file at '{}'. Using built-in settings.",
            default_path.display()
        );
        return Ok(UserConfig::default());
    }
    log::debug!("Loading config from '{}'.", default_path.display());
    load_config_file(&default_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_full_config_is_parsed_and_merged() {
        let file = write_config(
            r#"
prefix = "ACME"
syntax = "legacy"

[tables]
ignored_options = ["CLANG_WARN_DOCUMENTATION_COMMENTS"]
ignored_checkers = ["alpha.core.CastSize"]

[tables.strict]
GCC_WARN_UNUSED_PARAMETER = "YES"

[tables.display_names]
Warnings = "All the warnings"
"#,
        );
        let config = load_user_config(Some(file.path())).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("ACME"));
        assert_eq!(config.syntax, Some(SyntaxChoice::Legacy));

        let tables = config.build_tables();
        assert!(tables
            .catalog
            .ignored_options
            .contains("CLANG_WARN_DOCUMENTATION_COMMENTS"));
        // Built-in entries survive.
        assert!(tables
            .catalog
            .ignored_options
            .contains("CLANG_ANALYZER_USE_AFTER_MOVE"));
        assert!(tables.checkers.ignored_checkers.contains("alpha.core.CastSize"));
        assert_eq!(
            tables.overrides.strict.get("GCC_WARN_UNUSED_PARAMETER").map(String::as_str),
            Some("YES")
        );
        assert_eq!(tables.category_label("Warnings"), "All the warnings");
    }

    #[test]
    fn test_empty_config_keeps_builtin_tables() {
        let file = write_config("");
        let config = load_user_config(Some(file.path())).unwrap();
        assert_eq!(config, UserConfig::default());
        assert_eq!(config.build_tables(), Tables::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_user_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let file = write_config("prefx = \"TYPO\"\n");
        let err = load_user_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
    }

    #[test]
    fn test_invalid_syntax_value_is_rejected() {
        let file = write_config("syntax = \"fancy\"\n");
        assert!(load_config_file(file.path()).is_err());
    }
}
