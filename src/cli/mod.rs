//! CLI layer: argument parsing, command dispatch and the edit loop

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod repl;

pub use error::{CliError, CliResult};
