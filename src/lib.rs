//! Generates xcconfig files that turn on the compiler warnings and Clang static
//! analyzer checkers of an Xcode install.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command line definition and handlers.
pub mod cli;
/// Names, identifiers and Xcode bundle paths.
pub mod constants;
/// Spec resolution, catalog building, default values and rendering.
pub mod core;
/// Data types shared across modules.
pub mod models;
/// Processes, plists and the Xcode install.
pub mod system;
