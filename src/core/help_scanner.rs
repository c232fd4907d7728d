//! # Analyzer Help Scanner
//!
//! Extracts checker names from the output of `clang -cc1 -analyzer-checker-help`.
//! The output looks like:
//!
//! ```text
//! OVERVIEW: Clang Static Analyzer Checkers List
//!
//! USAGE: -analyzer-checker <CHECKER or PACKAGE,...>
//!
//! CHECKERS:
//!   core.CallAndMessage         Check for logical errors for function calls
//!   optin.cplusplus.UninitializedObject
//!                               Reports uninitialized fields after object construction
//! ```
//!
//! A checker whose name is too long to share a line with its documentation has
//! the documentation on the following line.

use crate::constants::CHECKERS_SENTINEL;
use crate::core::tables::Tables;
use crate::models::AnalyzerFlag;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    /// Before the `CHECKERS` header; everything is noise.
    Seeking,
    /// Inside the checker list. `pending` holds a checker still waiting for its doc line.
    Scanning { pending: Option<String> },
}

/// Single-pass line scanner. Feed it lines, then call `finish`.
#[derive(Debug)]
pub struct HelpScanner {
    state: ScanState,
    flags: Vec<AnalyzerFlag>,
}

impl Default for HelpScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpScanner {
    /// A scanner waiting for the checker list header.
    pub fn new() -> Self {
        Self {
            state: ScanState::Seeking,
            flags: Vec::new(),
        }
    }

    /// Consumes one line of help output.
    pub fn feed_line(&mut self, line: &str) {
        match &mut self.state {
            ScanState::Seeking => {
                if line.starts_with(CHECKERS_SENTINEL) {
                    log::trace!("Found checker list header.");
                    self.state = ScanState::Scanning { pending: None };
                }
            }
            ScanState::Scanning { pending } => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return;
                }
                if let Some(name) = pending.take() {
                    self.flags
                        .push(AnalyzerFlag::new(name, Some(trimmed.to_string())));
                    return;
                }
                match trimmed.split_once(char::is_whitespace) {
                    Some((name, doc)) => self
                        .flags
                        .push(AnalyzerFlag::new(name, Some(doc.trim().to_string()))),
                    None => {
                        log::trace!("Checker '{}' has its doc on the next line.", trimmed);
                        *pending = Some(trimmed.to_string());
                    }
                }
            }
        }
    }

    /// Ends the scan. A checker still waiting for documentation is emitted without it.
    pub fn finish(mut self) -> Vec<AnalyzerFlag> {
        if let ScanState::Scanning {
            pending: Some(name),
        } = self.state
        {
            self.flags.push(AnalyzerFlag::new(name, None));
        }
        self.flags
    }
}

/// Scans a whole help text in one go.
pub fn scan_lines<'a, I>(lines: I) -> Vec<AnalyzerFlag>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scanner = HelpScanner::new();
    for line in lines {
        scanner.feed_line(line);
    }
    scanner.finish()
}

/// Drops checkers that are internal, unstable, already driven by a build setting,
/// or (when disabled) about localization.
#[derive(Debug, Clone, Copy)]
pub struct CheckerFilter<'a> {
    tables: &'a Tables,
    claimed_tokens: &'a BTreeSet<String>,
    include_localization: bool,
}

impl<'a> CheckerFilter<'a> {
    /// Creates a filter. `claimed_tokens` are the command line tokens already driven by a setting.
    pub fn new(
        tables: &'a Tables,
        claimed_tokens: &'a BTreeSet<String>,
        include_localization: bool,
    ) -> Self {
        Self {
            tables,
            claimed_tokens,
            include_localization,
        }
    }

    /// Whether a single checker is kept, ignoring duplicates.
    pub fn is_valid(&self, flag: &AnalyzerFlag) -> bool {
        let rules = &self.tables.checkers;
        if flag.name.starts_with(&rules.debug_prefix) {
            return false;
        }
        if rules.ignored_checkers.contains(&flag.name) {
            return false;
        }
        if self.claimed_tokens.contains(&flag.name) {
            return false;
        }
        if !self.include_localization && self.tables.is_localization_related(&flag.name) {
            return false;
        }
        true
    }

    /// Keeps valid flags in scan order; a repeated name keeps its first occurrence.
    pub fn apply(&self, flags: Vec<AnalyzerFlag>) -> Vec<AnalyzerFlag> {
        let mut seen = HashSet::new();
        let kept: Vec<AnalyzerFlag> = flags
            .into_iter()
            .filter(|flag| self.is_valid(flag))
            .filter(|flag| seen.insert(flag.name.clone()))
            .collect();
        log::debug!("{} analyzer checker(s) kept after filtering.", kept.len());
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_inline_and_continuation_docs() {
        let lines = [
            "noise",
            "CHECKERS",
            "core.Foo A core checker",
            "core.Bar",
            "  another checker",
        ];
        let flags = scan_lines(lines);
        assert_eq!(
            flags,
            vec![
                AnalyzerFlag::new("core.Foo", Some("A core checker".to_string())),
                AnalyzerFlag::new("core.Bar", Some("another checker".to_string())),
            ]
        );
    }

    #[test]
    fn test_lines_before_header_are_ignored() {
        let flags = scan_lines(["core.Ignored looks like a checker", "USAGE: whatever"]);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_real_clang_layout() {
        let help = "OVERVIEW: Clang Static Analyzer Checkers List\n\
                    \n\
                    USAGE: -analyzer-checker <CHECKER or PACKAGE,...>\n\
                    \n\
                    CHECKERS:\n  \
                    core.CallAndMessage         Check for logical errors for function calls\n  \
                    optin.cplusplus.UninitializedObject\n                              \
                    Reports uninitialized fields after object construction\n  \
                    unix.Malloc                 Check for memory leaks, double free, and use-after-free problems\n";
        let flags = scan_lines(help.lines());
        let names: Vec<_> = flags.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["core.CallAndMessage", "optin.cplusplus.UninitializedObject", "unix.Malloc"]
        );
        assert_eq!(
            flags[1].doc.as_deref(),
            Some("Reports uninitialized fields after object construction")
        );
        assert_eq!(
            flags[2].doc.as_deref(),
            Some("Check for memory leaks, double free, and use-after-free problems")
        );
    }

    #[test]
    fn test_trailing_undocumented_flag_is_emitted() {
        let flags = scan_lines(["CHECKERS:", "core.First doc", "core.Last"]);
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[1], AnalyzerFlag::new("core.Last", None));
    }

    #[test]
    fn test_blank_lines_inside_list_are_skipped() {
        let flags = scan_lines(["CHECKERS:", "core.Pending", "", "its doc", "", "core.Next doc"]);
        assert_eq!(
            flags,
            vec![
                AnalyzerFlag::new("core.Pending", Some("its doc".to_string())),
                AnalyzerFlag::new("core.Next", Some("doc".to_string())),
            ]
        );
    }

    #[test]
    fn test_filter_drops_debug_ignored_claimed_and_duplicates() {
        let tables = Tables::default();
        let claimed: BTreeSet<String> = ["deadcode.DeadStores".to_string()].into();
        let filter = CheckerFilter::new(&tables, &claimed, true);

        let flags = vec![
            AnalyzerFlag::new("debug.DumpCFG", None),
            AnalyzerFlag::new("alpha.clone.CloneChecker", None),
            AnalyzerFlag::new("deadcode.DeadStores", None),
            AnalyzerFlag::new("core.NullDereference", Some("first".to_string())),
            AnalyzerFlag::new("core.NullDereference", Some("second".to_string())),
        ];
        let kept = filter.apply(flags);
        assert_eq!(
            kept,
            vec![AnalyzerFlag::new("core.NullDereference", Some("first".to_string()))]
        );
    }

    #[test]
    fn test_filter_localization_gate() {
        let tables = Tables::default();
        let claimed = BTreeSet::new();
        let flag = AnalyzerFlag::new("optin.osx.cocoa.localizability.NonLocalizedStringChecker", None);

        assert!(CheckerFilter::new(&tables, &claimed, true).is_valid(&flag));
        assert!(!CheckerFilter::new(&tables, &claimed, false).is_valid(&flag));
    }
}
