use crate::models::{DefaultStyle, SyntaxChoice};
use clap::Parser;

/// Command handlers.
pub mod handlers;

/// Builds the dynamic, color-aware full help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces placeholders like `<title>` with colored/styled text.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let err = if use_colors { "\x1b[91m" } else { "" }; // Bright Red
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// wax: generates an xcconfig enabling the warnings and analyzer checkers of an Xcode install.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Xcode installation to read [default: the one selected with xcode-select]
    #[arg(short = 'x', long, value_name = "PATH")]
    pub xcode_path: Option<String>,

    /// How the value of each build setting is chosen
    #[arg(short = 'd', long, value_enum, value_name = "STYLE", default_value_t = DefaultStyle::Placeholder)]
    pub defaults: DefaultStyle,

    /// Leave out the Swift compiler settings
    #[arg(long)]
    pub no_swift: bool,

    /// Leave out the Clang static analyzer settings and checkers
    #[arg(long)]
    pub no_analyzer: bool,

    /// Leave out settings and checkers about localization
    #[arg(long)]
    pub no_localization: bool,

    /// Write the description of each setting and checker as a comment
    #[arg(long)]
    pub doc: bool,

    /// Syntax of the analyzer checker variable [default: auto]
    #[arg(long, value_enum, value_name = "SYNTAX")]
    pub syntax: Option<SyntaxChoice>,

    /// Prefix of the analyzer checker variable [default: WAX]
    #[arg(long, value_name = "NAME")]
    pub prefix: Option<String>,

    /// Write the xcconfig to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,

    /// Configuration file [default: <config dir>/wax/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,
}
