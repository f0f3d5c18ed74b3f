//! Script generation from structure trees.
//!
//! Each emitter walks the tree depth-first in pre-order and writes one
//! creation statement per node below the root, so directories always come
//! before their contents. The output depends only on the tree.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::TreeArena;

/// Target language of a generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFormat {
    Python,
    Batch,
    Shell,
}

impl fmt::Display for ScriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptFormat::Python => write!(f, "python"),
            ScriptFormat::Batch => write!(f, "batch"),
            ScriptFormat::Shell => write!(f, "shell"),
        }
    }
}

/// Statement templates for one target language.
///
/// `rel` is the node's path below the root, one name per segment.
trait ScriptEmitter {
    fn header(&self, root: &str, out: &mut Vec<String>);
    fn directory(&self, rel: &[&str], out: &mut Vec<String>);
    fn file(&self, rel: &[&str], out: &mut Vec<String>);
    fn footer(&self, root: &str, out: &mut Vec<String>);
}

/// Generate a script that recreates `tree` on disk.
pub fn generate_script(tree: &TreeArena, format: ScriptFormat) -> ApplicationResult<String> {
    let root = tree.root_name().ok_or(ApplicationError::NoTree)?;
    let emitter: &dyn ScriptEmitter = match format {
        ScriptFormat::Python => &PythonEmitter,
        ScriptFormat::Batch => &BatchEmitter,
        ScriptFormat::Shell => &ShellEmitter,
    };

    let mut lines = Vec::new();
    emitter.header(root, &mut lines);

    let mut segments: Vec<&str> = Vec::new();
    for (_, node, depth) in tree.iter().skip(1) {
        segments.truncate(depth - 1);
        segments.push(node.name());
        if node.is_directory() {
            emitter.directory(&segments, &mut lines);
        } else {
            emitter.file(&segments, &mut lines);
        }
    }

    emitter.footer(root, &mut lines);
    debug!("generated {} script with {} lines", format, lines.len());
    Ok(lines.join("\n") + "\n")
}

struct PythonEmitter;

impl ScriptEmitter for PythonEmitter {
    fn header(&self, root: &str, out: &mut Vec<String>) {
        out.extend([
            "from pathlib import Path".to_string(),
            String::new(),
            format!("root_dir = Path(\"{}\")", python_escape(root)),
            "root_dir.mkdir(exist_ok=True)".to_string(),
            String::new(),
        ]);
    }

    fn directory(&self, rel: &[&str], out: &mut Vec<String>) {
        out.push(format!(
            "(root_dir / \"{}\").mkdir()",
            python_escape(&rel.join("/"))
        ));
    }

    fn file(&self, rel: &[&str], out: &mut Vec<String>) {
        out.push(format!(
            "(root_dir / \"{}\").touch()",
            python_escape(&rel.join("/"))
        ));
    }

    fn footer(&self, _root: &str, out: &mut Vec<String>) {
        out.extend([
            String::new(),
            "print(\"Project structure created successfully.\")".to_string(),
        ]);
    }
}

struct BatchEmitter;

impl ScriptEmitter for BatchEmitter {
    fn header(&self, root: &str, out: &mut Vec<String>) {
        let root = batch_escape(root);
        out.extend([
            "@echo off".to_string(),
            format!("if exist \"{}\" (", root),
            format!("  echo Directory {} already exists.", root),
            "  exit /b 1".to_string(),
            ")".to_string(),
            format!("mkdir \"{}\"", root),
            format!("cd \"{}\"", root),
            String::new(),
        ]);
    }

    fn directory(&self, rel: &[&str], out: &mut Vec<String>) {
        out.push(format!("mkdir \"{}\"", batch_escape(&rel.join("\\"))));
    }

    fn file(&self, rel: &[&str], out: &mut Vec<String>) {
        out.push(format!("type nul > \"{}\"", batch_escape(&rel.join("\\"))));
    }

    fn footer(&self, _root: &str, out: &mut Vec<String>) {
        out.extend([
            String::new(),
            "echo Project structure created successfully.".to_string(),
            "cd ..".to_string(),
        ]);
    }
}

struct ShellEmitter;

impl ScriptEmitter for ShellEmitter {
    fn header(&self, root: &str, out: &mut Vec<String>) {
        let root = shell_escape(root);
        out.extend([
            "#!/bin/bash".to_string(),
            format!("if [ -d \"{}\" ]; then", root),
            format!("  echo \"Directory {} already exists.\"", root),
            "  exit 1".to_string(),
            "fi".to_string(),
            format!("mkdir -p \"{}\"", root),
            format!("cd \"{}\" || exit 1", root),
            String::new(),
        ]);
    }

    fn directory(&self, rel: &[&str], out: &mut Vec<String>) {
        out.push(format!("mkdir -p \"{}\"", shell_escape(&rel.join("/"))));
    }

    fn file(&self, rel: &[&str], out: &mut Vec<String>) {
        out.push(format!("touch \"{}\"", shell_escape(&rel.join("/"))));
    }

    fn footer(&self, _root: &str, out: &mut Vec<String>) {
        out.extend([
            String::new(),
            "echo \"Project structure created successfully.\"".to_string(),
            "cd ..".to_string(),
        ]);
    }
}

fn python_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape for a double-quoted POSIX shell word.
fn shell_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn batch_escape(s: &str) -> String {
    s.replace('%', "%%")
}
