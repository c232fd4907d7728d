//! # System Interaction Layer
//!
//! Everything that touches the machine wax runs on: external processes, property
//! list conversion, and the layout of an Xcode installation.
//!
//! ## Modules
//!
//! - **`executor`**: blocking process execution with stdout capture.
//! - **`plist`**: converts plists to JSON through `plutil` and decodes specs and
//!   project templates.
//! - **`xcode`**: locates the Xcode bundle, its xcspec files and toolchain, and
//!   reads its version.

/// External process execution.
pub mod executor;
/// Plist to JSON conversion.
pub mod plist;
/// Xcode bundle layout and queries.
pub mod xcode;
