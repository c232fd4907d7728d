// src/bin/wax.rs

//! The `wax` command line tool.

use clap::Parser;
use colored::*;
use wax::cli::{Cli, handlers};

/// The main entry point of the `wax` application.
/// It sets up logging, parses arguments, runs the generator,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = handlers::generate::handle(Cli::parse()) {
        // `{:#}` prints the whole context chain on one line.
        eprintln!("{}: {:#}", wax::t!("error.label").red().bold(), e);
        std::process::exit(1);
    }
}
