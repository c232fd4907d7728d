// src/cli/handlers/mod.rs

/// The xcconfig generation pipeline.
pub mod generate;
