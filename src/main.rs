//! # gitinfo CLI
//!
//! This is the binary entry point for the `gitinfo` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Translating failures into an error message on stderr and the exit code
//!   defined in `gitinfo::exit_codes`.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use clap::Parser;
use gitinfo::exit_codes;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = cli.execute() {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_codes::for_anyhow(&err));
    }
}
