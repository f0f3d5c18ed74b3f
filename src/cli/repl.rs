//! Line-oriented editing loop.
//!
//! Reads one command per line and applies it to an [`EditorSession`].
//! Arguments are whitespace-separated; wrap an argument in double quotes
//! to keep spaces inside a name.

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use tracing::{debug, instrument};

use crate::application::services::StructureService;
use crate::application::{ApplicationError, EditorSession, ScriptFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::domain::{NodeKind, TreeNodeConvert};
use crate::infrastructure::InfraError;

pub const HELP: &str = "\
commands:
  show                       print the tree
  add-dir <parent> <name>    add a directory
  add-file <parent> <name>   add a file
  rename <path> <name>       rename an entry
  rm <path>                  remove an entry and its contents
  mv <source> <dest>         move an entry into another directory
  emit [python|batch|shell]  print the generated script
  save <file>                write the tree as an indented outline
  help                       show this help
  quit                       leave the editor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Show,
    Add {
        parent: String,
        name: String,
        kind: NodeKind,
    },
    Rename {
        path: String,
        name: String,
    },
    Remove {
        path: String,
    },
    Move {
        source: String,
        dest: String,
    },
    Emit {
        format: Option<ScriptFormat>,
    },
    Save {
        path: PathBuf,
    },
    Help,
    Quit,
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain output (trees, scripts, help)
    Text(String),
    /// Confirmation of a change
    Done(String),
    Quit,
}

/// A double-quoted argument or a run of non-whitespace.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("valid token pattern"));

/// Splits command lines into arguments, honouring double quotes.
pub struct CommandParser {
    token_regex: &'static Regex,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    pub fn new() -> Self {
        Self {
            token_regex: &TOKEN_REGEX,
        }
    }

    pub fn tokenize(&self, line: &str) -> Vec<String> {
        self.token_regex
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Parse one line; `Ok(None)` for blank lines.
    pub fn parse(&self, line: &str) -> CliResult<Option<EditCommand>> {
        let tokens = self.tokenize(line);
        let Some((verb, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match (verb.as_str(), args) {
            ("show" | "ls", []) => EditCommand::Show,
            ("add-dir", [parent, name]) => EditCommand::Add {
                parent: parent.clone(),
                name: name.clone(),
                kind: NodeKind::Directory,
            },
            ("add-file", [parent, name]) => EditCommand::Add {
                parent: parent.clone(),
                name: name.clone(),
                kind: NodeKind::File,
            },
            ("rename", [path, name]) => EditCommand::Rename {
                path: path.clone(),
                name: name.clone(),
            },
            ("rm", [path]) => EditCommand::Remove { path: path.clone() },
            ("mv", [source, dest]) => EditCommand::Move {
                source: source.clone(),
                dest: dest.clone(),
            },
            ("emit", []) => EditCommand::Emit { format: None },
            ("emit", [format]) => EditCommand::Emit {
                format: Some(
                    ScriptFormat::from_str(format, true)
                        .map_err(|_| CliError::InvalidArgs(format!("unknown format '{}'", format)))?,
                ),
            },
            ("save", [path]) => EditCommand::Save {
                path: PathBuf::from(path),
            },
            ("help" | "?", []) => EditCommand::Help,
            ("quit" | "exit" | "q", []) => EditCommand::Quit,
            (verb, _) => {
                return Err(CliError::Usage(format!(
                    "cannot parse '{}' (try 'help')",
                    verb
                )))
            }
        };
        Ok(Some(command))
    }
}

/// Editing loop bound to one session.
pub struct EditLoop<'a> {
    service: &'a StructureService,
    session: EditorSession,
    parser: CommandParser,
    unsaved: bool,
}

impl<'a> EditLoop<'a> {
    pub fn new(service: &'a StructureService, session: EditorSession) -> Self {
        Self {
            service,
            session,
            parser: CommandParser::new(),
            unsaved: false,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// True once an edit succeeded after the last `save`.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Apply one command. Errors leave the session unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: EditCommand) -> CliResult<Reply> {
        let reply = match command {
            EditCommand::Show => Reply::Text(self.session.tree().to_tree_string().to_string()),
            EditCommand::Add { parent, name, kind } => {
                let path = self
                    .session
                    .add_child(&parent, &name, kind)
                    .map_err(ApplicationError::from)?;
                self.unsaved = true;
                Reply::Done(format!("added {}", path))
            }
            EditCommand::Rename { path, name } => {
                let renamed = self
                    .session
                    .rename(&path, &name)
                    .map_err(ApplicationError::from)?;
                self.unsaved = true;
                Reply::Done(format!("renamed to {}", renamed))
            }
            EditCommand::Remove { path } => {
                if self.session.remove_by_path(&path) {
                    self.unsaved = true;
                    Reply::Done(format!("removed {}", path))
                } else {
                    return Err(CliError::InvalidArgs(format!("nothing at '{}'", path)));
                }
            }
            EditCommand::Move { source, dest } => {
                let moved = self
                    .session
                    .move_node(&source, &dest)
                    .map_err(ApplicationError::from)?;
                self.unsaved = true;
                Reply::Done(format!("moved to {}", moved))
            }
            EditCommand::Emit { format } => {
                Reply::Text(self.service.script(self.session.tree(), format)?)
            }
            EditCommand::Save { path } => {
                self.service.save_outline(&path, self.session.tree())?;
                self.unsaved = false;
                Reply::Done(format!("saved {}", path.display()))
            }
            EditCommand::Help => Reply::Text(HELP.to_string()),
            EditCommand::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Command errors are reported and the loop continues.
    pub fn run(&mut self, input: impl BufRead) -> CliResult<()> {
        let interactive = std::io::stdin().is_terminal();
        if interactive {
            output::header("dirsketch editor (type 'help' for commands)");
            output::prompt(">");
        }

        for line in input.lines() {
            let line = line.map_err(|e| InfraError::io("read command", e))?;
            debug!("command line: {:?}", line);

            let result = self
                .parser
                .parse(&line)
                .and_then(|command| command.map(|c| self.execute(c)).transpose());
            match result {
                Ok(Some(Reply::Quit)) => break,
                Ok(Some(Reply::Text(text))) => output::info(text.trim_end()),
                Ok(Some(Reply::Done(msg))) => output::success(&msg),
                Ok(None) => {}
                Err(e) => output::error(&e),
            }

            if interactive {
                output::prompt(">");
            }
        }

        if self.unsaved {
            output::warning("leaving editor with unsaved changes");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_quoted_argument_then_keeps_spaces() {
        let parser = CommandParser::new();
        assert_eq!(
            parser.tokenize(r#"add-file project "my notes.txt""#),
            vec!["add-file", "project", "my notes.txt"]
        );
    }

    #[test]
    fn given_blank_line_then_no_command() {
        assert_eq!(CommandParser::new().parse("   ").unwrap(), None);
    }

    #[test]
    fn given_wrong_arity_then_usage_error() {
        let result = CommandParser::new().parse("mv project/src");
        assert!(matches!(result, Err(CliError::Usage(_))));
    }

    #[test]
    fn given_unknown_format_then_invalid_args() {
        let result = CommandParser::new().parse("emit cobol");
        assert!(matches!(result, Err(CliError::InvalidArgs(_))));
    }
}
