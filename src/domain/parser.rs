//! Structure-text parser.
//!
//! Turns an indented sketch such as
//!
//! ```text
//! project/
//! ├── src/
//! │   └── main.py   # entry point
//! └── README.md
//! ```
//!
//! into a [`TreeArena`]. Nesting is derived from the width of each line's
//! indentation prefix (whitespace and tree-drawing glyphs), kinds are
//! inferred from the name.

use generational_arena::Index;
use tracing::{debug, instrument, trace, warn};

use crate::domain::arena::{NodeKind, TreeArena};

pub const DEFAULT_ROOT_NAME: &str = "project";
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Glyphs used by `tree`-style listings. They count toward indentation.
const TREE_GLYPHS: [char; 4] = ['│', '├', '└', '─'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Root name used when the first line is `.`
    pub default_root_name: String,
    /// Spaces substituted for each tab before measuring indentation
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_root_name: DEFAULT_ROOT_NAME.to_string(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// One entry line after indentation measurement, comment stripping and
/// kind inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEntry {
    /// Character width of the indentation prefix after tab expansion
    pub indent: usize,
    pub name: String,
    pub kind: NodeKind,
}

/// Parse `text` with `options`. Returns `None` when no usable line exists.
pub fn parse_structure(text: &str, options: &ParseOptions) -> Option<TreeArena> {
    StructureParser::new(options.clone()).parse(text)
}

/// Builds trees from structure text using an explicit ancestor stack.
#[derive(Debug, Clone, Default)]
pub struct StructureParser {
    options: ParseOptions,
}

impl StructureParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, text: &str) -> Option<TreeArena> {
        let mut lines = text.lines().filter(|line| !is_skipped_line(line));

        let first = lines.next()?;
        let mut tree = TreeArena::with_root(self.root_name(first));
        let root = tree.root()?;

        // Open ancestors; the root's sentinel indentation is below any real one.
        let mut stack: Vec<(Index, isize)> = vec![(root, -1)];

        for line in lines {
            let Some(entry) = parse_line(line, self.options.tab_width) else {
                trace!("no entry in line {:?}", line);
                continue;
            };
            let indent = entry.indent as isize;

            while stack.len() > 1 && stack.last().is_some_and(|&(_, open)| open >= indent) {
                stack.pop();
            }
            let parent = stack.last().map_or(root, |&(idx, _)| idx);

            match tree.append_child(parent, &entry.name, entry.kind) {
                Ok(idx) => {
                    trace!(indent, name = %entry.name, kind = %entry.kind, "entry");
                    if entry.kind.is_directory() {
                        stack.push((idx, indent));
                    }
                }
                Err(e) => warn!("skipping '{}': {}", entry.name, e),
            }
        }

        debug!(nodes = tree.len(), "parsed structure");
        Some(tree)
    }

    /// Root name from the first usable line.
    fn root_name(&self, line: &str) -> String {
        let name = strip_trailing_separator(line.trim());
        if name == "." || name.is_empty() {
            self.options.default_root_name.clone()
        } else {
            name.to_string()
        }
    }
}

/// Blank lines and full-line `#` / `//` comments carry no entry.
fn is_skipped_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Split one non-root line into indentation, name and kind.
///
/// Returns `None` when nothing but indentation and comment remains.
pub fn parse_line(line: &str, tab_width: usize) -> Option<LineEntry> {
    let expanded = line.replace('\t', &" ".repeat(tab_width));

    let prefix_end = expanded
        .char_indices()
        .find(|&(_, c)| !is_indent_char(c))
        .map_or(expanded.len(), |(pos, _)| pos);
    let (prefix, rest) = expanded.split_at(prefix_end);
    let indent = prefix.chars().count();

    let raw = strip_inline_comment(rest).trim();
    if raw.is_empty() {
        return None;
    }

    let kind = infer_kind(raw);
    let name = strip_trailing_separator(raw);
    if name.is_empty() {
        return None;
    }

    Some(LineEntry {
        indent,
        name: name.to_string(),
        kind,
    })
}

fn is_indent_char(c: char) -> bool {
    c.is_whitespace() || TREE_GLYPHS.contains(&c)
}

/// Cut at the earliest `#` or `//`.
fn strip_inline_comment(text: &str) -> &str {
    let cut = [text.find('#'), text.find("//")].into_iter().flatten().min();
    match cut {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// A trailing separator or the absence of any `.` marks a directory.
pub fn infer_kind(name: &str) -> NodeKind {
    if name.ends_with('/') || name.ends_with('\\') || !name.contains('.') {
        NodeKind::Directory
    } else {
        NodeKind::File
    }
}

fn strip_trailing_separator(name: &str) -> &str {
    name.strip_suffix('/')
        .or_else(|| name.strip_suffix('\\'))
        .unwrap_or(name)
}
