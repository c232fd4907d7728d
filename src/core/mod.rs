// src/core/mod.rs

/// Option filtering and grouping.
pub mod catalog;
/// User configuration file.
pub mod config_loader;
/// Value of a setting under a default style.
pub mod defaults;
/// Analyzer checker extraction from clang help output.
pub mod help_scanner;
/// Config directory and path expansion.
pub mod paths;
/// Xcconfig serialization.
pub mod renderer;
/// `BasedOn` inheritance of xcspec records.
pub mod spec_resolver;
/// Built-in lookup tables.
pub mod tables;
