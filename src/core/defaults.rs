// src/core/defaults.rs

use crate::core::tables::DefaultOverrides;
use crate::models::{BuildOption, DefaultStyle, IdeDefaults, OptionType};
use std::collections::BTreeSet;
use thiserror::Error;

const ENABLED: &str = "YES";
const DISABLED: &str = "NO";
const ENABLED_AGGRESSIVE: &str = "YES_AGGRESSIVE";
const ENABLED_ERROR: &str = "YES_ERROR";
const ENABLED_NON_AGGRESSIVE: &str = "YES_NONAGGRESSIVE";
const SHALLOW: &str = "shallow";
const DEEP: &str = "deep";

/// Errors raised while computing a setting value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefaultValueError {
    /// The `clang` style needs a declared default and there is none.
    #[error("Build setting '{name}' declares no default value.")]
    MissingDefault {
        /// The build setting.
        name: String,
    },
    /// No aggressive value is known for this type or set of values.
    #[error("Unknown default value for {name} (Type: {type_name}; Values: {values:?})")]
    UnknownDefaultShape {
        /// The build setting.
        name: String,
        /// Its declared type.
        type_name: String,
        /// Its enumeration values, if any.
        values: Vec<String>,
    },
}

/// Computes the value written for a setting under a given style.
///
/// Resolution is pure: the same option and style always give the same text.
#[derive(Debug, Clone, Copy)]
pub struct DefaultResolver<'a> {
    overrides: &'a DefaultOverrides,
    ide_defaults: &'a IdeDefaults,
}

impl<'a> DefaultResolver<'a> {
    /// Creates a resolver over the given overrides and Xcode defaults.
    pub fn new(overrides: &'a DefaultOverrides, ide_defaults: &'a IdeDefaults) -> Self {
        Self {
            overrides,
            ide_defaults,
        }
    }

    /// Value written for `option` under `style`.
    pub fn resolve(
        &self,
        option: &BuildOption,
        style: DefaultStyle,
    ) -> Result<String, DefaultValueError> {
        match style {
            DefaultStyle::Placeholder => Ok(placeholder(option)),
            DefaultStyle::Tool => tool_default(option),
            DefaultStyle::Ide => match self.ide_defaults.get(&option.name) {
                Some(value) => Ok(value.clone()),
                None => tool_default(option),
            },
            DefaultStyle::Strict => match self.overrides.strict.get(&option.name) {
                Some(value) => Ok(value.clone()),
                None => self.aggressive(option),
            },
            DefaultStyle::Aggressive => self.aggressive(option),
        }
    }

    fn aggressive(&self, option: &BuildOption) -> Result<String, DefaultValueError> {
        if let Some(value) = self.overrides.aggressive.get(&option.name) {
            return Ok(value.clone());
        }
        let value = match &option.option_type {
            OptionType::Boolean => Some(ENABLED),
            OptionType::Enumeration(values) => aggressive_enum_value(values),
            _ => None,
        };
        value
            .map(str::to_string)
            .ok_or_else(|| DefaultValueError::UnknownDefaultShape {
                name: option.name.clone(),
                type_name: option.option_type.type_name().to_string(),
                values: match &option.option_type {
                    OptionType::Enumeration(values) => values.clone(),
                    _ => Vec::new(),
                },
            })
    }
}

/// The most restrictive value of an enumeration, for the shapes Apple's specs use.
/// Anything else yields `None`: guessing would defeat the point of a strict default.
pub fn aggressive_enum_value(values: &[String]) -> Option<&'static str> {
    let set: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    let is_exactly = |expected: &[&str]| set == expected.iter().copied().collect::<BTreeSet<&str>>();

    if is_exactly(&[ENABLED, DISABLED]) {
        Some(ENABLED)
    } else if set.contains(ENABLED_AGGRESSIVE) {
        Some(ENABLED_AGGRESSIVE)
    } else if set.contains(ENABLED_ERROR) {
        Some(ENABLED_ERROR)
    } else if is_exactly(&[ENABLED, ENABLED_NON_AGGRESSIVE, DISABLED]) {
        Some(ENABLED)
    } else if is_exactly(&[SHALLOW, DEEP]) {
        Some(DEEP)
    } else {
        None
    }
}

fn tool_default(option: &BuildOption) -> Result<String, DefaultValueError> {
    option
        .tool_default
        .clone()
        .ok_or_else(|| DefaultValueError::MissingDefault {
            name: option.name.clone(),
        })
}

fn placeholder(option: &BuildOption) -> String {
    let shape = match &option.option_type {
        OptionType::Boolean => format!("{} | {}", ENABLED, DISABLED),
        OptionType::Enumeration(values) => values.join(" | "),
        other => other.type_name().to_string(),
    };
    format!("// {}", shape)
}
