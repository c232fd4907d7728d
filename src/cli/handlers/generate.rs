// src/cli/handlers/generate.rs

use crate::{
    cli::Cli,
    constants::{
        CLANG_ANALYZER_ID, CLANG_COMPILER_ID, CLANG_XCSPEC_NAME, CLANG_XCSPEC_PLUGIN,
        DEFAULT_VARIABLE_PREFIX, GENERATOR_NAME, SWIFT_COMPILER_ID, SWIFT_XCSPEC_NAME,
        SWIFT_XCSPEC_PLUGIN, UBSAN_CATEGORY_PATTERN, WARNINGS_CATEGORY_PATTERN,
    },
    core::{
        catalog::{self, CatalogBuilder, OptionFilter},
        config_loader,
        defaults::{DefaultResolver, DefaultValueError},
        help_scanner::{self, CheckerFilter},
        paths,
        renderer::{self, RenderOptions},
        spec_resolver::SpecDocument,
        tables::Tables,
    },
    models::{DefaultStyle, IdeDefaults, ResolvedCatalog},
    system::{plist, xcode::{self, XcodeInstall}},
};
use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Everything read from the Xcode install that feeds the catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    /// The `Clang LLVM 1.0` spec, always required.
    pub clang: &'a SpecDocument,
    /// `None` when Swift settings are disabled.
    pub swift: Option<&'a SpecDocument>,
    /// Output of the analyzer checker help. `None` when the analyzer is disabled.
    pub analyzer_help: Option<&'a str>,
}

/// The main handler: reads the Xcode install, builds the catalog and writes the xcconfig.
pub fn handle(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    // --- 1. Configuration ---
    let config_path = cli.config.as_deref().map(paths::expand_path).transpose()?;
    let config = config_loader::load_user_config(config_path.as_deref())?;
    let tables = config.build_tables();

    // --- 2. Xcode install ---
    let xcode_path = cli.xcode_path.as_deref().map(paths::expand_path).transpose()?;
    let install = XcodeInstall::locate(xcode_path.as_deref())
        .context("Could not locate an Xcode installation")?;
    let version = install.version().context("Could not read the Xcode version")?;
    log::debug!("Using {} at '{}'.", version, install.root().display());

    // --- 3. Specs and analyzer help ---
    let clang_spec = plist::load_spec_document(
        &install.xcspec_path(CLANG_XCSPEC_PLUGIN, CLANG_XCSPEC_NAME)?,
    )?;
    let swift_spec = if cli.no_swift {
        None
    } else {
        Some(plist::load_spec_document(
            &install.xcspec_path(SWIFT_XCSPEC_PLUGIN, SWIFT_XCSPEC_NAME)?,
        )?)
    };
    let analyzer_help = if cli.no_analyzer {
        None
    } else {
        Some(
            install
                .analyzer_checker_help()
                .context("Could not list the Clang analyzer checkers")?,
        )
    };

    let sources = CatalogSources {
        clang: &clang_spec,
        swift: swift_spec.as_ref(),
        analyzer_help: analyzer_help.as_deref(),
    };
    let catalog = build_catalog(&sources, &tables, !cli.no_localization)?;

    // --- 4. Xcode's own defaults, only needed by the `xcode` style ---
    let ide_defaults = if cli.defaults == DefaultStyle::Ide {
        plist::load_ide_defaults(&install.project_template_info())
            .context("Could not read Xcode's default project settings")?
    } else {
        IdeDefaults::new()
    };

    // --- 5. Render ---
    let choice = cli.syntax.or(config.syntax).unwrap_or_default();
    let options = RenderOptions {
        add_doc: cli.doc,
        variable_prefix: cli
            .prefix
            .or(config.prefix)
            .unwrap_or_else(|| DEFAULT_VARIABLE_PREFIX.to_string()),
        syntax: xcode::resolve_syntax(choice, &version),
        generator: format!("{} {}", GENERATOR_NAME, env!("CARGO_PKG_VERSION")),
        target_version: version,
    };
    let resolver = DefaultResolver::new(&tables.overrides, &ide_defaults);
    let text = match renderer::render(&catalog, &resolver, cli.defaults, &options) {
        Ok(text) => text,
        Err(e) => {
            if let DefaultValueError::UnknownDefaultShape {
                name,
                type_name,
                values,
            } = &e
            {
                log::error!(
                    "No aggressive value known for '{}' (type {}, values {:?}).",
                    name,
                    type_name,
                    values
                );
            }
            return Err(e).context("Could not compute the build setting values");
        }
    };

    // --- 6. Output ---
    match cli.output.as_deref() {
        Some(raw) => {
            let path = paths::expand_path(raw)?;
            write_atomically(&path, &text)?;
            eprintln!(
                "{} {}",
                t!("generate.status.written").green(),
                path.display()
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Builds the catalog from already loaded inputs. Performs no I/O.
pub fn build_catalog(
    sources: &CatalogSources<'_>,
    tables: &Tables,
    include_localization: bool,
) -> Result<ResolvedCatalog> {
    let builder = CatalogBuilder::new(tables, include_localization);
    let warnings = OptionFilter::category(WARNINGS_CATEGORY_PATTERN)?;
    let mut groups = Vec::new();

    let compiler = sources
        .clang
        .resolve_tool(CLANG_COMPILER_ID)
        .context("Could not resolve the Clang compiler spec")?;
    catalog::merge_groups(&mut groups, builder.parse_options(&compiler, &warnings));

    if sources.analyzer_help.is_some() {
        let ubsan = OptionFilter::category(UBSAN_CATEGORY_PATTERN)?;
        catalog::merge_groups(&mut groups, builder.parse_options(&compiler, &ubsan));

        let analyzer = sources
            .clang
            .resolve_tool(CLANG_ANALYZER_ID)
            .context("Could not resolve the Clang analyzer spec")?;
        catalog::merge_groups(
            &mut groups,
            builder.parse_options(&analyzer, &OptionFilter::all()),
        );
    }

    if let Some(swift_spec) = sources.swift {
        let swift = swift_spec
            .resolve_tool(SWIFT_COMPILER_ID)
            .context("Could not resolve the Swift compiler spec")?;
        catalog::merge_groups(&mut groups, builder.parse_options(&swift, &warnings));
    }

    let flags = match sources.analyzer_help {
        Some(help) => {
            let scanned = help_scanner::scan_lines(help.lines());
            if scanned.is_empty() {
                log::warn!("{}", t!("generate.warning.no_checkers"));
            }
            let claimed = catalog::claimed_tokens(&groups);
            CheckerFilter::new(tables, &claimed, include_localization).apply(scanned)
        }
        None => Vec::new(),
    };

    log::debug!(
        "Catalog built: {} group(s), {} analyzer checker(s).",
        groups.len(),
        flags.len()
    );
    Ok(ResolvedCatalog { groups, flags })
}

/// Writes through a temporary file in the destination directory, so a failed run
/// never leaves a truncated xcconfig behind.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Could not create a temporary file in '{}'", dir.display()))?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    temp_file
        .persist(path)
        .with_context(|| format!("Could not write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SyntaxMode;
    use serde_json::json;
    use std::fs;

    fn clang_spec() -> SpecDocument {
        SpecDocument::from_value(json!([
            {
                "Identifier": "com.apple.compilers.llvm.clang.1_0",
                "Name": "Apple Clang",
                "Options": [
                    { "Name": "GCC_WARN_SHADOW", "Type": "Boolean", "DefaultValue": "NO",
                      "Category": "Warnings", "CommandLineArgs": { "YES": ["-Wshadow"], "NO": [] } },
                    { "Name": "CLANG_UNDEFINED_BEHAVIOR_SANITIZER_INTEGER", "Type": "Boolean",
                      "DefaultValue": "NO", "Category": "UBSANPolicy" },
                    { "Name": "GCC_OPTIMIZATION_LEVEL", "Type": "Enumeration", "Values": ["0", "s"],
                      "DefaultValue": "s", "Category": "CodeGeneration" }
                ]
            },
            {
                "Identifier": "com.apple.compilers.llvm.clang.1_0.compiler",
                "BasedOn": "com.apple.compilers.llvm.clang.1_0"
            },
            {
                "Identifier": "com.apple.compilers.llvm.clang.1_0.analyzer",
                "BasedOn": "com.apple.compilers.llvm.clang.1_0",
                "Name": "Static Analyzer",
                "Options": [
                    { "Name": "CLANG_ANALYZER_DEADCODE_DEADSTORES", "Type": "Boolean", "DefaultValue": "YES",
                      "Category": "SACheckers",
                      "CommandLineArgs": { "NO": ["-Xclang -analyzer-disable-checker -Xclang deadcode.DeadStores"] } }
                ]
            }
        ]))
        .unwrap()
    }

    fn swift_spec() -> SpecDocument {
        SpecDocument::from_value(json!([
            {
                "Identifier": "com.apple.xcode.tools.swift.compiler",
                "Name": "Swift Compiler",
                "Options": [
                    { "Name": "SWIFT_TREAT_WARNINGS_AS_ERRORS", "Type": "Boolean", "DefaultValue": "NO",
                      "Category": "WarningsPolicy" }
                ]
            }
        ]))
        .unwrap()
    }

    const HELP: &str = "OVERVIEW: Clang Static Analyzer Checkers List\n\
                        \n\
                        CHECKERS:\n  \
                        core.NullDereference        Check for dereferences of null pointers\n  \
                        deadcode.DeadStores         Check for values stored to variables that are never read\n  \
                        debug.DumpCFG               Display Control-Flow Graphs\n";

    fn option_names(catalog: &ResolvedCatalog) -> Vec<&str> {
        catalog
            .groups
            .iter()
            .flat_map(|g| &g.options)
            .map(|o| o.name.as_str())
            .collect()
    }

    #[test]
    fn test_full_catalog() {
        let tables = Tables::default();
        let clang = clang_spec();
        let swift = swift_spec();
        let sources = CatalogSources {
            clang: &clang,
            swift: Some(&swift),
            analyzer_help: Some(HELP),
        };
        let catalog = build_catalog(&sources, &tables, true).unwrap();

        assert_eq!(
            option_names(&catalog),
            vec![
                "GCC_WARN_SHADOW",
                "CLANG_UNDEFINED_BEHAVIOR_SANITIZER_INTEGER",
                "CLANG_ANALYZER_DEADCODE_DEADSTORES",
                "SWIFT_TREAT_WARNINGS_AS_ERRORS",
            ]
        );
        let display: Vec<&str> = catalog.groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(
            display,
            vec![
                "Apple Clang - Warnings - All languages",
                "Apple Clang - Undefined Behavior Sanitizer",
                "Static Analyzer - Generic Issues",
                "Swift Compiler - Warnings - Warning Policies",
            ]
        );
        // deadcode.DeadStores is driven by a build setting, debug.* is internal.
        let flags: Vec<&str> = catalog.flags.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(flags, vec!["core.NullDereference"]);
    }

    #[test]
    fn test_catalog_without_swift_or_analyzer() {
        let tables = Tables::default();
        let clang = clang_spec();
        let sources = CatalogSources {
            clang: &clang,
            swift: None,
            analyzer_help: None,
        };
        let catalog = build_catalog(&sources, &tables, true).unwrap();
        assert_eq!(option_names(&catalog), vec!["GCC_WARN_SHADOW"]);
        assert!(catalog.flags.is_empty());
    }

    #[test]
    fn test_missing_compiler_tool_fails() {
        let tables = Tables::default();
        let clang = SpecDocument::from_value(json!([])).unwrap();
        let sources = CatalogSources {
            clang: &clang,
            swift: None,
            analyzer_help: None,
        };
        assert!(build_catalog(&sources, &tables, true).is_err());
    }

    #[test]
    fn test_pipeline_output_is_deterministic() {
        let tables = Tables::default();
        let clang = clang_spec();
        let swift = swift_spec();
        let sources = CatalogSources {
            clang: &clang,
            swift: Some(&swift),
            analyzer_help: Some(HELP),
        };
        let ide = IdeDefaults::new();
        let resolver = DefaultResolver::new(&tables.overrides, &ide);
        let options = RenderOptions {
            add_doc: true,
            variable_prefix: "WAX".to_string(),
            syntax: SyntaxMode::Modern,
            generator: "wax test".to_string(),
            target_version: "Xcode 15.0".to_string(),
        };

        let render_once = || {
            let catalog = build_catalog(&sources, &tables, true).unwrap();
            renderer::render(&catalog, &resolver, DefaultStyle::Aggressive, &options).unwrap()
        };
        let first = render_once();
        assert_eq!(first, render_once());
        assert!(first.contains("GCC_WARN_SHADOW = YES\n"));
        assert!(first.contains("WAX_ANALYZER_FLAGS = $(inherited) -Xclang -analyzer-checker -Xclang core.NullDereference\n"));
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Warnings.xcconfig");
        fs::write(&target, "old").unwrap();

        write_atomically(&target, "// new\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "// new\n");
        // Only the target remains, no stray temporary file.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
