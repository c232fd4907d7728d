//! # Plist Bridge
//!
//! Xcode ships its specs and templates as property lists in binary, XML or the
//! old NeXTSTEP text format. `plutil` converts any of them to JSON, which is then
//! decoded with `serde_json`.

use crate::core::spec_resolver::SpecDocument;
use crate::models::IdeDefaults;
use crate::system::executor::{self, ExecutionError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a property list.
#[derive(Error, Debug)]
pub enum PlistError {
    /// `plutil` could not be run or failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// `plutil` output could not be decoded.
    #[error("plutil produced invalid JSON for '{path}': {source}")]
    Json {
        /// The plist that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The decoded plist lacks the expected structure.
    #[error("Unexpected content in '{path}': {message}")]
    UnexpectedShape {
        /// The plist that was read.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

/// Converts a property list to JSON with `plutil -convert json -o - <path>`.
pub fn plist_to_json(path: &Path) -> Result<Value, PlistError> {
    let path_arg = path.to_string_lossy();
    let output = executor::execute_and_capture_output(
        "plutil",
        &["-convert", "json", "-o", "-", &path_arg],
        &HashMap::new(),
    )?;
    serde_json::from_str(&output).map_err(|source| PlistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every record of an xcspec file.
pub fn load_spec_document(path: &Path) -> Result<SpecDocument, PlistError> {
    let value = plist_to_json(path)?;
    let document = SpecDocument::from_value(value).map_err(|e| PlistError::UnexpectedShape {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::debug!(
        "Loaded {} spec record(s) from '{}'.",
        document.len(),
        path.display()
    );
    Ok(document)
}

/// Loads the build settings Xcode applies to new projects.
pub fn load_ide_defaults(path: &Path) -> Result<IdeDefaults, PlistError> {
    let value = plist_to_json(path)?;
    ide_defaults_from_value(&value).ok_or_else(|| PlistError::UnexpectedShape {
        path: path.to_path_buf(),
        message: "missing 'Project.SharedSettings' dictionary".to_string(),
    })
}

/// Extracts the string entries of `Project.SharedSettings` from a template's
/// `TemplateInfo.plist`. Non-string entries are skipped.
pub fn ide_defaults_from_value(template_info: &Value) -> Option<IdeDefaults> {
    let settings = template_info
        .get("Project")?
        .get("SharedSettings")?
        .as_object()?;
    Some(
        settings
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
            .collect(),
    )
}
