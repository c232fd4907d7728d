//! # Tables
//!
//! The static knowledge wax applies on top of Apple's specs: category display
//! names, settings and checkers to leave out, and per-setting value overrides.
//!
//! The tables are plain values handed to the catalog builder, the checker filter
//! and the default resolver. `Tables::default()` holds the built-in knowledge; a
//! user configuration file can extend it before a run starts.

use std::collections::{BTreeMap, BTreeSet};

/// Rules deciding which xcspec options are dropped from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRules {
    /// Settings known to be noisy, dropped by exact name.
    pub ignored_options: BTreeSet<String>,
    /// Name suffix marking experimental or unstable settings.
    pub experimental_suffix: String,
    /// Argument placeholder meaning "substitute the user supplied value".
    pub value_placeholder: String,
    /// Case-insensitive marker of localization-related settings and checkers.
    pub localization_marker: String,
}

/// Rules deciding which analyzer checkers are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerRules {
    /// Namespace of internal debugging checkers.
    pub debug_prefix: String,
    /// Checkers too noisy or unstable to enable.
    pub ignored_checkers: BTreeSet<String>,
}

/// Per-setting values replacing the computed ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefaultOverrides {
    /// Used by the `strict` style; everything else falls back to `aggressive`.
    pub strict: BTreeMap<String, String>,
    /// Settings whose most restrictive value is not the naive maximum.
    pub aggressive: BTreeMap<String, String>,
}

/// Every lookup table used during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    /// Category key to human readable label.
    pub display_names: BTreeMap<String, String>,
    /// Rules applied to xcspec options.
    pub catalog: CatalogRules,
    /// Rules applied to analyzer checkers.
    pub checkers: CheckerRules,
    /// Per-setting values for the `strict` and `aggressive` styles.
    pub overrides: DefaultOverrides,
}

impl Tables {
    /// Human readable label of an xcspec category, or the raw key if unknown.
    pub fn category_label<'a>(&'a self, category_key: &'a str) -> &'a str {
        self.display_names
            .get(category_key)
            .map(String::as_str)
            .unwrap_or(category_key)
    }

    /// Whether a setting or checker name is about localization.
    pub fn is_localization_related(&self, name: &str) -> bool {
        name.to_ascii_lowercase()
            .contains(&self.catalog.localization_marker.to_ascii_lowercase())
    }
}

fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn string_set(entries: &[&str]) -> BTreeSet<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            display_names: string_map(&[
                ("WarningsObjCARC", "Warnings - Objective C and ARC"),
                ("WarningsPolicy", "Warnings - Warning Policies"),
                ("WarningsCXX", "Warnings - C++"),
                ("WarningsObjC", "Warnings - Objective C"),
                ("Warnings", "Warnings - All languages"),
                ("LanguageModules", "Language - Modules"),
                ("SAObjCCheckers", "Issues - Objective C"),
                ("SASecurityCheckers", "Issues - Security"),
                ("SAAppleAPICheckers", "Issues - Apple APIs"),
                ("SACheckers", "Generic Issues"),
                ("SAPolicy", "Analysis Policy"),
                ("UBSANPolicy", "Undefined Behavior Sanitizer"),
            ]),
            catalog: CatalogRules {
                ignored_options: string_set(&[
                    "CLANG_ANALYZER_OSOBJECT_C_STYLE_CAST",
                    "CLANG_ANALYZER_USE_AFTER_MOVE",
                ]),
                experimental_suffix: "_EXPERIMENTAL".to_string(),
                value_placeholder: "$(value)".to_string(),
                localization_marker: "localiz".to_string(),
            },
            checkers: CheckerRules {
                debug_prefix: "debug.".to_string(),
                ignored_checkers: string_set(&[
                    // Too many false positives.
                    "alpha.clone.CloneChecker",
                    "alpha.deadcode.UnreachableCode",
                ]),
            },
            overrides: DefaultOverrides {
                strict: string_map(&[
                    // Fires on patterns the Objective-C runtime handles fine.
                    ("CLANG_WARN_OBJC_REPEATED_USE_OF_WEAK", "NO"),
                    // Debug builds need room for quick experiments.
                    ("GCC_TREAT_WARNINGS_AS_ERRORS", "NO"),
                    // Apple frameworks do not build cleanly with it.
                    ("GCC_WARN_PEDANTIC", "NO"),
                    // Meaningless with Objective-C 2.0 auto synthesis.
                    ("CLANG_WARN_OBJC_MISSING_PROPERTY_SYNTHESIS", "NO"),
                    // Delegate methods routinely ignore parameters.
                    ("GCC_WARN_UNUSED_PARAMETER", "NO"),
                ]),
                aggressive: string_map(&[
                    ("GCC_WARN_INHIBIT_ALL_WARNINGS", "NO"),
                    ("SWIFT_SUPPRESS_WARNINGS", "NO"),
                ]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_falls_back_to_raw_key() {
        let tables = Tables::default();
        assert_eq!(tables.category_label("WarningsCXX"), "Warnings - C++");
        assert_eq!(tables.category_label("SomethingNew"), "SomethingNew");
    }

    #[test]
    fn test_localization_marker_is_case_insensitive() {
        let tables = Tables::default();
        assert!(tables.is_localization_related("CLANG_ANALYZER_LOCALIZABILITY_NONLOCALIZED"));
        assert!(tables.is_localization_related("optin.osx.cocoa.localizability.EmptyLocalizationContextChecker"));
        assert!(!tables.is_localization_related("GCC_WARN_UNUSED_VARIABLE"));
    }
}
