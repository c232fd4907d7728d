//! # Xcode Locator
//!
//! Knows where things live inside an Xcode bundle: the xcspec files describing the
//! compilers, the toolchain binaries, the project template holding Xcode's own
//! defaults. Also queries the install for its version and the analyzer checkers.

use crate::constants::{
    ANALYZER_HELP_FLAG, DEVELOPER_DIR_SUFFIX, PROJECT_TEMPLATE_INFO_PATH, TOOLCHAIN_BIN_TEMPLATE,
    XCSPEC_PATH_TEMPLATE, XCSPEC_SEARCH_ROOTS,
};
use crate::models::{SyntaxChoice, SyntaxMode};
use crate::system::executor::{self, ExecutionError};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

lazy_static! {
    static ref XCODE_MAJOR_RE: Regex = Regex::new(r"Xcode (\d+)").expect("valid regex");
}

/// First Xcode release understanding `$(inherited)` on repeated assignments.
const MODERN_SYNTAX_MIN_MAJOR: u32 = 10;

/// Errors raised while inspecting an Xcode install.
#[derive(Error, Debug)]
pub enum XcodeError {
    /// The bundle directory does not exist.
    #[error("No Xcode installation found at '{path}'.")]
    InstallNotFound {
        /// The path that was checked.
        path: PathBuf,
    },
    /// The xcspec file is neither at its usual path nor anywhere in the bundle.
    #[error("Could not find '{spec}.xcspec' in '{install}'.")]
    SpecFileNotFound {
        /// The spec file name, without extension.
        spec: String,
        /// The Xcode bundle searched.
        install: PathBuf,
    },
    /// An Xcode tool could not be run or failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// An Xcode application bundle, e.g. `/Applications/Xcode.app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XcodeInstall {
    root: PathBuf,
}

impl XcodeInstall {
    /// Wraps an existing bundle directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, XcodeError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(XcodeError::InstallNotFound { path: root });
        }
        Ok(Self { root })
    }

    /// Uses `explicit` when given, otherwise the install selected with `xcode-select`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, XcodeError> {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        let output = executor::execute_and_capture_output("xcode-select", &["-p"], &HashMap::new())?;
        let root = install_root_from_developer_dir(Path::new(output.trim()));
        log::debug!("xcode-select points to '{}'.", root.display());
        Self::new(root)
    }

    /// The bundle directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Contents/Developer`, the value of `DEVELOPER_DIR` for this install.
    pub fn developer_dir(&self) -> PathBuf {
        self.root.join(DEVELOPER_DIR_SUFFIX)
    }

    /// Finds `<spec>.xcspec` of a plug-in. Falls back to searching the bundle when
    /// the file is not at its usual location.
    pub fn xcspec_path(&self, plugin: &str, spec: &str) -> Result<PathBuf, XcodeError> {
        let relative = XCSPEC_PATH_TEMPLATE
            .replace("{plugin}", plugin)
            .replace("{spec}", spec);
        let expected = self.root.join(relative);
        if expected.is_file() {
            return Ok(expected);
        }

        log::warn!(
            "'{}' not found, searching the Xcode bundle for '{}.xcspec'.",
            expected.display(),
            spec
        );
        let file_name = format!("{}.xcspec", spec);
        for search_root in XCSPEC_SEARCH_ROOTS {
            let found = WalkDir::new(self.root.join(search_root))
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name.as_str());
            if let Some(entry) = found {
                log::debug!("Found '{}'.", entry.path().display());
                return Ok(entry.into_path());
            }
        }
        Err(XcodeError::SpecFileNotFound {
            spec: spec.to_string(),
            install: self.root.clone(),
        })
    }

    /// A binary of the default toolchain.
    pub fn toolchain_binary(&self, bin: &str) -> PathBuf {
        self.root.join(TOOLCHAIN_BIN_TEMPLATE.replace("{bin}", bin))
    }

    /// `TemplateInfo.plist` of the base project template.
    pub fn project_template_info(&self) -> PathBuf {
        self.root.join(PROJECT_TEMPLATE_INFO_PATH)
    }

    /// `xcodebuild -version` of this install, on one line.
    pub fn version(&self) -> Result<String, XcodeError> {
        let mut env = HashMap::new();
        env.insert(
            "DEVELOPER_DIR".to_string(),
            self.developer_dir().to_string_lossy().into_owned(),
        );
        let output = executor::execute_and_capture_output("xcodebuild", &["-version"], &env)?;
        Ok(join_lines(&output))
    }

    /// Raw output of `clang -cc1 -analyzer-checker-help` from the install's toolchain.
    pub fn analyzer_checker_help(&self) -> Result<String, XcodeError> {
        let clang = self.toolchain_binary("clang");
        let output = executor::execute_and_capture_output(
            &clang.to_string_lossy(),
            &["-cc1", ANALYZER_HELP_FLAG],
            &HashMap::new(),
        )?;
        Ok(output)
    }
}

/// `xcode-select -p` prints the `Contents/Developer` directory of the bundle.
fn install_root_from_developer_dir(developer_dir: &Path) -> PathBuf {
    if developer_dir.ends_with(DEVELOPER_DIR_SUFFIX) {
        if let Some(root) = developer_dir.ancestors().nth(2) {
            return root.to_path_buf();
        }
    }
    developer_dir.to_path_buf()
}

fn join_lines(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Major version from a `xcodebuild -version` line such as `Xcode 15.0 Build version 15A240d`.
pub fn major_version(version: &str) -> Option<u32> {
    XCODE_MAJOR_RE
        .captures(version)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Turns the requested syntax into a concrete one. `auto` picks the modern syntax
/// for Xcode 10 and later, the legacy one otherwise or when the version is unknown.
pub fn resolve_syntax(choice: SyntaxChoice, version: &str) -> SyntaxMode {
    match choice {
        SyntaxChoice::Legacy => SyntaxMode::Legacy,
        SyntaxChoice::Modern => SyntaxMode::Modern,
        SyntaxChoice::Auto => match major_version(version) {
            Some(major) if major >= MODERN_SYNTAX_MIN_MAJOR => SyntaxMode::Modern,
            Some(_) => SyntaxMode::Legacy,
            None => {
                log::warn!(
                    "Could not read the Xcode version from '{}'. Using the legacy syntax.",
                    version
                );
                SyntaxMode::Legacy
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_install_is_reported() {
        let dir = tempdir().unwrap();
        let err = XcodeInstall::new(dir.path().join("Xcode.app")).unwrap_err();
        assert!(matches!(err, XcodeError::InstallNotFound { .. }));
    }

    #[test]
    fn test_developer_dir_suffix_is_stripped() {
        assert_eq!(
            install_root_from_developer_dir(Path::new("/Applications/Xcode.app/Contents/Developer")),
            PathBuf::from("/Applications/Xcode.app")
        );
        assert_eq!(
            install_root_from_developer_dir(Path::new("/Library/Developer/CommandLineTools")),
            PathBuf::from("/Library/Developer/CommandLineTools")
        );
    }

    #[test]
    fn test_xcspec_at_expected_location() {
        let dir = tempdir().unwrap();
        let install = XcodeInstall::new(dir.path()).unwrap();
        let expected = dir.path().join(
            XCSPEC_PATH_TEMPLATE
                .replace("{plugin}", "Clang LLVM 1.0")
                .replace("{spec}", "Clang LLVM 1.0"),
        );
        fs::create_dir_all(expected.parent().unwrap()).unwrap();
        fs::write(&expected, "()").unwrap();

        assert_eq!(install.xcspec_path("Clang LLVM 1.0", "Clang LLVM 1.0").unwrap(), expected);
    }

    #[test]
    fn test_xcspec_found_by_search() {
        let dir = tempdir().unwrap();
        let install = XcodeInstall::new(dir.path()).unwrap();
        let moved = dir
            .path()
            .join("Contents/SharedFrameworks/SwiftSupport.framework/Resources/Swift.xcspec");
        fs::create_dir_all(moved.parent().unwrap()).unwrap();
        fs::write(&moved, "()").unwrap();

        assert_eq!(install.xcspec_path("XCLanguageSupport", "Swift").unwrap(), moved);
    }

    #[test]
    fn test_xcspec_not_found() {
        let dir = tempdir().unwrap();
        let install = XcodeInstall::new(dir.path()).unwrap();
        let err = install.xcspec_path("XCLanguageSupport", "Swift").unwrap_err();
        assert!(matches!(err, XcodeError::SpecFileNotFound { spec, .. } if spec == "Swift"));
    }

    #[test]
    fn test_toolchain_binary_path() {
        let dir = tempdir().unwrap();
        let install = XcodeInstall::new(dir.path()).unwrap();
        assert!(install
            .toolchain_binary("clang")
            .ends_with("XcodeDefault.xctoolchain/usr/bin/clang"));
    }

    #[test]
    fn test_version_lines_are_joined() {
        assert_eq!(
            join_lines("Xcode 15.0\nBuild version 15A240d\n"),
            "Xcode 15.0 Build version 15A240d"
        );
    }

    #[test]
    fn test_syntax_resolution() {
        assert_eq!(resolve_syntax(SyntaxChoice::Auto, "Xcode 15.0 Build version 15A240d"), SyntaxMode::Modern);
        assert_eq!(resolve_syntax(SyntaxChoice::Auto, "Xcode 10.0 Build version 10A255"), SyntaxMode::Modern);
        assert_eq!(resolve_syntax(SyntaxChoice::Auto, "Xcode 9.4.1 Build version 9F2000"), SyntaxMode::Legacy);
        assert_eq!(resolve_syntax(SyntaxChoice::Auto, "garbage"), SyntaxMode::Legacy);
        assert_eq!(resolve_syntax(SyntaxChoice::Legacy, "Xcode 15.0"), SyntaxMode::Legacy);
        assert_eq!(resolve_syntax(SyntaxChoice::Modern, "Xcode 9.0"), SyntaxMode::Modern);
    }
}
