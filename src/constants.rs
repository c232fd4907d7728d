// src/constants.rs

/// Name used in the provenance header of every generated file.
pub const GENERATOR_NAME: &str = "wax";

/// The name of the directory containing wax configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "wax";

/// The name of the user configuration file.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default prefix of the variable holding the analyzer checker flags.
pub const DEFAULT_VARIABLE_PREFIX: &str = "WAX";

/// The build setting the analyzer variable is wired into.
pub const COMPILER_FLAGS_VARIABLE: &str = "WARNING_CFLAGS";

/// The xcconfig token that expands to the previously assigned value.
pub const INHERITED_TOKEN: &str = "$(inherited)";

/// Line that opens the checker list in `clang -cc1 -analyzer-checker-help`.
pub const CHECKERS_SENTINEL: &str = "CHECKERS";

/// Help flag passed to the toolchain clang to list analyzer checkers.
pub const ANALYZER_HELP_FLAG: &str = "-analyzer-checker-help";

// --- Xcode tool identifiers ---

/// Clang compiler tool in `Clang LLVM 1.0.xcspec`.
pub const CLANG_COMPILER_ID: &str = "com.apple.compilers.llvm.clang.1_0.compiler";
/// Clang static analyzer tool in `Clang LLVM 1.0.xcspec`.
pub const CLANG_ANALYZER_ID: &str = "com.apple.compilers.llvm.clang.1_0.analyzer";
/// Swift compiler tool in `Swift.xcspec`.
pub const SWIFT_COMPILER_ID: &str = "com.apple.xcode.tools.swift.compiler";

// --- Xcode bundle layout ---

/// Plug-in holding the Clang compiler and analyzer specs.
pub const CLANG_XCSPEC_PLUGIN: &str = "Clang LLVM 1.0";
/// File name of the Clang spec, without extension.
pub const CLANG_XCSPEC_NAME: &str = "Clang LLVM 1.0";

/// Plug-in holding the Swift compiler spec.
pub const SWIFT_XCSPEC_PLUGIN: &str = "XCLanguageSupport";
/// File name of the Swift spec, without extension.
pub const SWIFT_XCSPEC_NAME: &str = "Swift";

/// Category pattern of the compiler warning settings.
pub const WARNINGS_CATEGORY_PATTERN: &str = "^Warning";

/// Category of the undefined behavior sanitizer settings.
pub const UBSAN_CATEGORY_PATTERN: &str = "^UBSANPolicy$";

/// Suffix `xcode-select -p` appends to the install path.
pub const DEVELOPER_DIR_SUFFIX: &str = "Contents/Developer";

/// Relative path of an xcspec file; `{plugin}` and `{spec}` are substituted.
pub const XCSPEC_PATH_TEMPLATE: &str = "Contents/PlugIns/Xcode3Core.ideplugin/Contents/SharedSupport/Developer/Library/Xcode/Plug-ins/{plugin}.xcplugin/Contents/Resources/{spec}.xcspec";

/// Directories searched for an xcspec when the template path does not exist.
pub const XCSPEC_SEARCH_ROOTS: &[&str] = &["Contents/PlugIns", "Contents/SharedFrameworks"];

/// Relative path of the toolchain binaries; `{bin}` is substituted.
pub const TOOLCHAIN_BIN_TEMPLATE: &str =
    "Contents/Developer/Toolchains/XcodeDefault.xctoolchain/usr/bin/{bin}";

/// Relative path of the base project template holding Xcode's default build settings.
pub const PROJECT_TEMPLATE_INFO_PATH: &str = "Contents/Developer/Library/Xcode/Templates/Project Templates/Base/Base_ProjectSettings.xctemplate/TemplateInfo.plist";
