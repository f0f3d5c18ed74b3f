//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::ScriptFormat;

/// Turn an indented directory sketch into a tree you can edit and a script that builds it
#[derive(Parser, Debug)]
#[command(name = "dirsketch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding a local .dirsketch.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a structure and show it as a tree
    Show {
        /// Structure file, or - for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Print the normalized indented outline instead of a tree
        #[arg(long)]
        outline: bool,
    },

    /// Generate a script that creates the structure
    Emit {
        /// Structure file, or - for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Script format (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<ScriptFormat>,
        /// Write the script to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Edit a structure interactively (commands on stdin)
    Edit {
        /// Structure file
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
