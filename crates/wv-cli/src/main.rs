//! # wv CLI
//!
//! Command-line interface for Word Vault.
//!
//! This binary provides human-friendly access to `wv-core` functionality.
//! Run `wv --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
