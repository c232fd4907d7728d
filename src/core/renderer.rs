// src/core/renderer.rs

use crate::constants::{COMPILER_FLAGS_VARIABLE, INHERITED_TOKEN};
use crate::core::defaults::{DefaultResolver, DefaultValueError};
use crate::models::{
    AnalyzerFlag, BuildOption, DefaultStyle, OptionGroup, ResolvedCatalog, SyntaxMode,
};

/// Presentation settings of a generated xcconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit descriptions as comments above each setting and checker.
    pub add_doc: bool,
    /// Prefix of the `<PREFIX>_ANALYZER_FLAGS` variable.
    pub variable_prefix: String,
    /// Legacy or modern analyzer variable syntax.
    pub syntax: SyntaxMode,
    /// Tool name and version written in the header.
    pub generator: String,
    /// Version of the Xcode install the settings were read from.
    pub target_version: String,
}

impl RenderOptions {
    /// Name of the variable listing the analyzer checkers.
    pub fn analyzer_variable(&self) -> String {
        format!("{}_ANALYZER_FLAGS", self.variable_prefix)
    }
}

/// Serializes a catalog into xcconfig text.
///
/// The output only depends on the inputs: groups are sorted by display name
/// (ties keep catalog order), settings by name, checkers keep scan order.
///
/// # Errors
/// Fails only when a setting has no value under `style`.
pub fn render(
    catalog: &ResolvedCatalog,
    resolver: &DefaultResolver<'_>,
    style: DefaultStyle,
    options: &RenderOptions,
) -> Result<String, DefaultValueError> {
    let mut lines = vec![
        format!("// Generated using {}", options.generator),
        format!("// Target: {}", options.target_version),
        String::new(),
    ];

    let mut groups: Vec<&OptionGroup> = catalog.groups.iter().collect();
    groups.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        render_group(&mut lines, group, resolver, style, options.add_doc)?;
    }

    if !catalog.flags.is_empty() {
        if !groups.is_empty() {
            lines.push(String::new());
        }
        render_analyzer_flags(&mut lines, &catalog.flags, options);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

fn render_group(
    lines: &mut Vec<String>,
    group: &OptionGroup,
    resolver: &DefaultResolver<'_>,
    style: DefaultStyle,
    add_doc: bool,
) -> Result<(), DefaultValueError> {
    lines.push(format!("// {}", group.display_name));

    let mut options: Vec<&BuildOption> = group.options.iter().collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));

    for option in options {
        if add_doc {
            if let Some(description) = option
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
            {
                let label = option.display_name.as_deref().unwrap_or(&option.name);
                push_doc(lines, label, description);
            }
        }
        let value = resolver.resolve(option, style)?;
        lines.push(format!("{} = {}", option.name, value));
    }
    Ok(())
}

fn render_analyzer_flags(lines: &mut Vec<String>, flags: &[AnalyzerFlag], options: &RenderOptions) {
    let variable = options.analyzer_variable();
    lines.push("// Clang Analyzer Flags".to_string());

    match options.syntax {
        SyntaxMode::Legacy => {
            if options.add_doc {
                for flag in flags {
                    lines.push(flag_doc(flag));
                }
            }
            let joined: Vec<String> = flags.iter().map(AnalyzerFlag::command_line).collect();
            lines.push(format!("{} = {}", variable, joined.join(" ")));
        }
        SyntaxMode::Modern => {
            for flag in flags {
                if options.add_doc {
                    lines.push(flag_doc(flag));
                }
                lines.push(format!(
                    "{} = {} {}",
                    variable,
                    INHERITED_TOKEN,
                    flag.command_line()
                ));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} = {} $({})",
        COMPILER_FLAGS_VARIABLE, INHERITED_TOKEN, variable
    ));
}

fn flag_doc(flag: &AnalyzerFlag) -> String {
    match &flag.doc {
        Some(doc) => format!("// {}: {}", flag.name, doc),
        None => format!("// {}", flag.name),
    }
}

/// Multi-line descriptions become one comment line per line.
fn push_doc(lines: &mut Vec<String>, label: &str, description: &str) {
    let mut description_lines = description.lines().map(str::trim_end);
    let first = description_lines.next().unwrap_or_default();
    lines.push(format!("// {}: {}", label, first).trim_end().to_string());
    for line in description_lines {
        if line.is_empty() {
            lines.push("//".to_string());
        } else {
            lines.push(format!("// {}", line));
        }
    }
}
