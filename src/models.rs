// src/models.rs

use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

// --- RAW XCSPEC MODELS ---
// What a flattened xcspec record decodes into. Field names follow the
// PascalCase keys Apple uses in its specs.

/// A tool definition after `BasedOn` inheritance has been flattened.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ToolSpecRecord {
    /// Unique identifier of the tool, e.g. `com.apple.xcode.tools.swift.compiler`.
    pub identifier: String,
    /// Tool name shown in Xcode.
    pub name: String,
    /// Identifier of the parent record.
    #[serde(default)]
    pub based_on: Option<String>,
    /// Build settings declared by the tool.
    #[serde(default)]
    pub options: Vec<RawOption>,
}

/// One entry of a tool's `Options` array, exactly as declared.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawOption {
    /// Build setting name, e.g. `CLANG_WARN_EMPTY_BODY`.
    pub name: String,
    /// Declared type, as spelled in the spec.
    #[serde(rename = "Type", default)]
    pub option_type: String,
    /// Label shown in the build settings editor.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Help text.
    #[serde(default)]
    pub description: Option<String>,
    /// Settings without one are hidden from the build settings editor.
    #[serde(default)]
    pub category: Option<String>,
    /// Allowed values of an enumeration.
    #[serde(default)]
    pub values: Vec<RawEnumValue>,
    /// Default applied by the tool itself.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub default_value: Option<String>,
    /// Compiler arguments the setting expands to.
    #[serde(default)]
    pub command_line_args: Option<CommandLineArgs>,
}

/// `Values` entries are either bare strings or dictionaries with a `Value` key.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawEnumValue {
    /// `"YES"`
    Plain(String),
    /// `{ Value = "YES"; DisplayName = ...; }`
    Described {
        /// The value itself.
        #[serde(rename = "Value")]
        value: String,
    },
}

impl RawEnumValue {
    /// The value, whatever its shape.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(v) | Self::Described { value: v } => v,
        }
    }
}

/// The shapes `CommandLineArgs` takes in the wild: a single string, a list,
/// or a dictionary keyed by the option value.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum CommandLineArgs {
    /// `"-Wfoo"`
    Single(String),
    /// `("-Wfoo", "-Wbar")`
    List(Vec<String>),
    /// `{ YES = "-Wfoo"; NO = "-Wno-foo"; }`
    ByValue(BTreeMap<String, CommandLineArgs>),
}

impl CommandLineArgs {
    /// Flattens every argument into whitespace-separated tokens, in declaration order.
    pub fn tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens(&self, out: &mut Vec<String>) {
        match self {
            Self::Single(arg) => out.extend(arg.split_whitespace().map(str::to_string)),
            Self::List(args) => {
                for arg in args {
                    out.extend(arg.split_whitespace().map(str::to_string));
                }
            }
            Self::ByValue(map) => {
                for nested in map.values() {
                    nested.collect_tokens(out);
                }
            }
        }
    }
}

/// Plists store defaults as strings, but JSON conversion may hand us numbers or booleans.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Bool(b)) => Some(if b { "YES" } else { "NO" }.to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// --- NORMALIZED MODELS ---

/// The value shape of a build setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionType {
    /// `YES` or `NO`.
    Boolean,
    /// One of the listed values.
    Enumeration(Vec<String>),
    /// A single path.
    Path,
    /// Whitespace separated paths.
    PathList,
    /// Free text.
    String,
    /// Whitespace separated words.
    StringList,
    /// Any type the resolver has no heuristic for, with its raw name.
    Unsupported(String),
}

impl OptionType {
    /// Maps a declared type name, case-insensitively.
    pub fn from_raw(raw_type: &str, values: &[RawEnumValue]) -> Self {
        match raw_type.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Self::Boolean,
            "enumeration" | "enum" => {
                Self::Enumeration(values.iter().map(|v| v.as_str().to_string()).collect())
            }
            "path" => Self::Path,
            "pathlist" => Self::PathList,
            "string" => Self::String,
            "stringlist" => Self::StringList,
            _ => Self::Unsupported(raw_type.to_string()),
        }
    }

    /// Free-form values cannot be given an on/off or enumerated default.
    pub fn is_free_form(&self) -> bool {
        matches!(
            self,
            Self::Path | Self::PathList | Self::String | Self::StringList
        )
    }

    /// Type name as written in xcspecs.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Boolean => "Boolean",
            Self::Enumeration(_) => "Enumeration",
            Self::Path => "Path",
            Self::PathList => "PathList",
            Self::String => "String",
            Self::StringList => "StringList",
            Self::Unsupported(raw) => raw,
        }
    }
}

/// A single configurable build setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOption {
    /// Build setting name.
    pub name: String,
    /// Label shown in Xcode.
    pub display_name: Option<String>,
    /// Category key, e.g. `WarningsPolicy`.
    pub category: String,
    /// Value shape.
    pub option_type: OptionType,
    /// Default declared by the tool spec.
    pub tool_default: Option<String>,
    /// Help text from the spec.
    pub description: Option<String>,
    /// Flattened command line tokens.
    pub command_line_args: Vec<String>,
}

impl BuildOption {
    /// Normalizes a raw option. Options without a category are not settings a
    /// user browses in Xcode, so they yield `None`.
    pub fn from_raw(raw: &RawOption) -> Option<Self> {
        let category = raw.category.clone()?;
        Some(Self {
            name: raw.name.clone(),
            display_name: raw.display_name.clone(),
            category,
            option_type: OptionType::from_raw(&raw.option_type, &raw.values),
            tool_default: raw.default_value.clone(),
            description: raw.description.clone(),
            command_line_args: raw
                .command_line_args
                .as_ref()
                .map(CommandLineArgs::tokens)
                .unwrap_or_default(),
        })
    }
}

/// Options of one tool sharing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    /// Name of the tool declaring the options.
    pub tool_name: String,
    /// Raw category key.
    pub category_key: String,
    /// Human readable category label.
    pub display_name: String,
    /// Options in declaration order.
    pub options: Vec<BuildOption>,
}

/// A Clang static analyzer checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerFlag {
    /// Dotted checker name, e.g. `core.NullDereference`.
    pub name: String,
    /// One line help text.
    pub doc: Option<String>,
}

impl AnalyzerFlag {
    /// Creates a checker entry.
    pub fn new(name: impl Into<String>, doc: Option<String>) -> Self {
        Self {
            name: name.into(),
            doc,
        }
    }

    /// The compiler arguments enabling this checker.
    pub fn command_line(&self) -> String {
        format!("-Xclang -analyzer-checker -Xclang {}", self.name)
    }
}

/// Xcode's own defaults for new projects, keyed by build setting name.
pub type IdeDefaults = BTreeMap<String, String>;

/// Everything the renderer needs, built once per run.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCatalog {
    /// Setting groups in output order.
    pub groups: Vec<OptionGroup>,
    /// Analyzer checkers in output order.
    pub flags: Vec<AnalyzerFlag>,
}

// --- STYLES AND MODES ---

/// Policy used to pick the value written for each setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefaultStyle {
    /// No value, a commented placeholder describing the accepted values.
    #[value(name = "none")]
    Placeholder,
    /// The default declared by the compiler spec.
    #[value(name = "clang", alias = "tool")]
    Tool,
    /// The default Xcode uses when creating a new project.
    #[value(name = "xcode", alias = "ide")]
    Ide,
    /// Hand picked values on top of `aggressive`.
    Strict,
    /// Everything on.
    Aggressive,
}

/// How the analyzer checker variable is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxMode {
    /// A single assignment listing every checker.
    Legacy,
    /// One `$(inherited)` assignment per checker.
    Modern,
}

/// Syntax requested on the command line or in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxChoice {
    /// Pick from the Xcode version.
    #[default]
    Auto,
    /// Always [`SyntaxMode::Legacy`].
    Legacy,
    /// Always [`SyntaxMode::Modern`].
    Modern,
}
