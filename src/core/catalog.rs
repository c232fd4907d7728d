//! # Catalog
//!
//! Turns a flattened tool definition into named groups of build settings.
//! Every option goes through a fixed veto chain before the caller's filter is
//! consulted, so a setting that can never get a meaningful static value is never
//! rendered, whatever the filter says.

use crate::core::tables::Tables;
use crate::models::{BuildOption, OptionGroup, ToolSpecRecord};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors raised while preparing a catalog pass.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A filter pattern is not a valid regex.
    #[error("Invalid {kind} filter '{pattern}': {source}")]
    InvalidFilter {
        /// Which filter the pattern belongs to.
        kind: &'static str,
        /// The rejected pattern.
        pattern: String,
        /// The underlying error.
        #[source]
        source: regex::Error,
    },
}

/// Selects which surviving options of a tool end up in the catalog.
///
/// An option passes when its category matches the category pattern OR any of its
/// command line tokens matches the argument pattern. With no pattern at all,
/// everything passes.
#[derive(Debug, Clone, Default)]
pub struct OptionFilter {
    category: Option<Regex>,
    command_line_args: Option<Regex>,
}

impl OptionFilter {
    /// A filter letting every option through.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter matching options whose category matches `pattern`.
    pub fn category(pattern: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            category: Some(compile(pattern, "category")?),
            command_line_args: None,
        })
    }

    /// Also lets through options with a command line token matching `pattern`.
    pub fn with_command_line_args(mut self, pattern: &str) -> Result<Self, CatalogError> {
        self.command_line_args = Some(compile(pattern, "command line argument")?);
        Ok(self)
    }

    /// Whether the option passes the filter.
    pub fn matches(&self, option: &BuildOption) -> bool {
        if self.category.is_none() && self.command_line_args.is_none() {
            return true;
        }
        let category_match = self
            .category
            .as_ref()
            .is_some_and(|re| re.is_match(&option.category));
        let args_match = self.command_line_args.as_ref().is_some_and(|re| {
            option
                .command_line_args
                .iter()
                .any(|token| re.is_match(token))
        });
        category_match || args_match
    }
}

fn compile(pattern: &str, kind: &'static str) -> Result<Regex, CatalogError> {
    Regex::new(pattern).map_err(|source| CatalogError::InvalidFilter {
        kind,
        pattern: pattern.to_string(),
        source,
    })
}

/// Why an option was left out of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VetoReason {
    /// Listed in the ignored options.
    Ignored,
    /// Name carries the experimental suffix.
    Experimental,
    /// Path or string valued.
    FreeFormType,
    /// Needs a user supplied value on the command line.
    RequiresValue,
    /// About localization, and localization is disabled.
    Localization,
}

/// Builds option groups for one parsing session.
#[derive(Debug, Clone, Copy)]
pub struct CatalogBuilder<'a> {
    tables: &'a Tables,
    include_localization: bool,
}

impl<'a> CatalogBuilder<'a> {
    /// Creates a builder; `include_localization` keeps localization settings.
    pub fn new(tables: &'a Tables, include_localization: bool) -> Self {
        Self {
            tables,
            include_localization,
        }
    }

    /// Runs the veto chain; the first rule that applies wins.
    pub fn veto_reason(&self, option: &BuildOption) -> Option<VetoReason> {
        let rules = &self.tables.catalog;
        if rules.ignored_options.contains(&option.name) {
            return Some(VetoReason::Ignored);
        }
        if option.name.ends_with(&rules.experimental_suffix) {
            return Some(VetoReason::Experimental);
        }
        if option.option_type.is_free_form() {
            return Some(VetoReason::FreeFormType);
        }
        if option
            .command_line_args
            .iter()
            .any(|token| token.contains(&rules.value_placeholder))
        {
            return Some(VetoReason::RequiresValue);
        }
        if !self.include_localization && self.tables.is_localization_related(&option.name) {
            return Some(VetoReason::Localization);
        }
        None
    }

    /// Groups the tool's options by category, in first-seen category order.
    pub fn parse_options(&self, tool: &ToolSpecRecord, filter: &OptionFilter) -> Vec<OptionGroup> {
        let mut groups: Vec<OptionGroup> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for raw in &tool.options {
            let Some(option) = BuildOption::from_raw(raw) else {
                log::trace!("Skipping '{}': no category.", raw.name);
                continue;
            };
            if let Some(reason) = self.veto_reason(&option) {
                log::trace!("Skipping '{}': vetoed ({:?}).", option.name, reason);
                continue;
            }
            if !filter.matches(&option) {
                continue;
            }

            let slot = match group_index.get(&option.category) {
                Some(&slot) => slot,
                None => {
                    groups.push(OptionGroup {
                        tool_name: tool.name.clone(),
                        category_key: option.category.clone(),
                        display_name: format!(
                            "{} - {}",
                            tool.name,
                            self.tables.category_label(&option.category)
                        ),
                        options: Vec::new(),
                    });
                    group_index.insert(option.category.clone(), groups.len() - 1);
                    groups.len() - 1
                }
            };
            if let Some(group) = groups.get_mut(slot) {
                group.options.push(option);
            }
        }

        log::debug!(
            "Parsed {} group(s) from tool '{}' ({}).",
            groups.len(),
            tool.name,
            tool.identifier
        );
        groups
    }
}

/// Adds groups from another parsing pass, keeping `(tool, category)` unique.
/// Options already present in a merged group are not duplicated.
pub fn merge_groups(catalog: &mut Vec<OptionGroup>, incoming: Vec<OptionGroup>) {
    for group in incoming {
        let existing = catalog.iter_mut().find(|g| {
            g.tool_name == group.tool_name && g.category_key == group.category_key
        });
        match existing {
            Some(target) => {
                for option in group.options {
                    if !target.options.iter().any(|o| o.name == option.name) {
                        target.options.push(option);
                    }
                }
            }
            None => catalog.push(group),
        }
    }
}

/// Every command line token used by an option of the catalog.
pub fn claimed_tokens(groups: &[OptionGroup]) -> BTreeSet<String> {
    groups
        .iter()
        .flat_map(|group| &group.options)
        .flat_map(|option| option.command_line_args.iter().cloned())
        .collect()
}
