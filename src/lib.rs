//! dirsketch: parse indented directory sketches, edit them, and emit scripts
//! that recreate them on disk.
//!
//! Layers, inner to outer:
//! - [`domain`]: structure tree, parser, path addressing (no I/O)
//! - [`application`]: editing session, script generation, services
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
