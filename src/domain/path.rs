//! Path addressing for structure trees.
//!
//! A path is the `/`-joined list of names from the root down to a node, root
//! included (`project/src/main.py`). Paths are re-resolved from the root on
//! every call; nothing is cached.

use generational_arena::Index;
use tracing::trace;

use crate::domain::arena::TreeArena;

pub const SEPARATOR: char = '/';

impl TreeArena {
    /// Resolve `path` to a node.
    ///
    /// The first segment must match the root's name. Returns `None` for an
    /// empty tree, an empty path, a missing segment, or a file in an
    /// intermediate position. With duplicate sibling names the first wins.
    pub fn resolve(&self, path: &str) -> Option<Index> {
        let root = self.root()?;
        let mut segments = path.split(SEPARATOR);
        let first = segments.next()?;
        if first.is_empty() || self.get_node(root)?.name() != first {
            return None;
        }

        let mut current = root;
        for segment in segments {
            if !self.get_node(current)?.is_directory() {
                trace!("resolve: '{}' stops at a file", path);
                return None;
            }
            current = self.find_child(current, segment)?;
        }
        Some(current)
    }

    /// Path of `idx`, root included. `None` for stale handles.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(idx);
        while let Some(c) = current {
            let node = self.get_node(c)?;
            names.push(node.name());
            current = node.parent();
        }
        names.reverse();
        Some(names.join("/"))
    }

    pub fn root_name(&self) -> Option<&str> {
        self.root()
            .and_then(|r| self.get_node(r))
            .map(|n| n.name())
    }
}

/// Split a path into its parent path and final segment.
///
/// `"project"` has no parent: `(None, "project")`.
pub fn split_parent(path: &str) -> (Option<&str>, &str) {
    match path.rfind(SEPARATOR) {
        Some(pos) => (Some(&path[..pos]), &path[pos + 1..]),
        None => (None, path),
    }
}

/// True if `dest` equals `source` or lies inside the subtree it names.
pub fn is_same_or_descendant(source: &str, dest: &str) -> bool {
    dest == source
        || dest
            .strip_prefix(source)
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
}
