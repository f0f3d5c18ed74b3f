//! Editing session over a single structure tree.
//!
//! Every operation takes paths and re-resolves them from the root, so callers
//! never hold node handles across edits. A failed operation leaves the tree
//! unchanged.

use generational_arena::Index;
use tracing::{debug, info};

use crate::domain::path::{is_same_or_descendant, split_parent};
use crate::domain::{DomainError, NodeKind, ParseOptions, StructureParser, TreeArena, TreeNode};

pub type EditResult<T> = Result<T, DomainError>;

/// Owns the tree being edited.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    tree: TreeArena,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: TreeArena) -> Self {
        Self { tree }
    }

    /// Replace the current tree with one parsed from `text`.
    ///
    /// Returns false (and leaves the session empty) when the text has no
    /// usable lines.
    pub fn load(&mut self, text: &str, options: &ParseOptions) -> bool {
        self.tree = StructureParser::new(options.clone())
            .parse(text)
            .unwrap_or_default();
        !self.tree.is_empty()
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn resolve(&self, path: &str) -> Option<Index> {
        self.tree.resolve(path)
    }

    pub fn node(&self, path: &str) -> Option<&TreeNode> {
        self.resolve(path).and_then(|idx| self.tree.get_node(idx))
    }

    /// Append `name` under the directory at `parent_path`.
    ///
    /// Returns the path of the new node.
    pub fn add_child(&mut self, parent_path: &str, name: &str, kind: NodeKind) -> EditResult<String> {
        let name = validate_name(name)?;
        let parent = self.require(parent_path)?;
        if !self.is_directory(parent) {
            return Err(DomainError::InvalidOperation(format!(
                "'{}' is a file and cannot hold children",
                parent_path
            )));
        }
        if self.tree.find_child(parent, name).is_some() {
            return Err(DomainError::DuplicateName {
                parent: parent_path.to_string(),
                name: name.to_string(),
            });
        }

        self.tree.append_child(parent, name, kind)?;
        let path = format!("{}/{}", parent_path, name);
        info!("added {} {}", kind, path);
        Ok(path)
    }

    /// Rename the node at `path`. Returns its new path.
    pub fn rename(&mut self, path: &str, new_name: &str) -> EditResult<String> {
        let new_name = validate_name(new_name)?;
        let idx = self.require(path)?;
        let (parent_path, old_name) = split_parent(path);
        if old_name == new_name {
            debug!("rename: '{}' unchanged", path);
            return Ok(path.to_string());
        }

        if let Some(parent) = self.tree.get_node(idx).and_then(TreeNode::parent) {
            let taken = self.tree.children(parent).iter().any(|&sibling| {
                sibling != idx
                    && self
                        .tree
                        .get_node(sibling)
                        .is_some_and(|n| n.name() == new_name)
            });
            if taken {
                return Err(DomainError::DuplicateName {
                    parent: parent_path.unwrap_or_default().to_string(),
                    name: new_name.to_string(),
                });
            }
        }

        self.tree.set_name(idx, new_name)?;
        let renamed = match parent_path {
            Some(parent_path) => format!("{}/{}", parent_path, new_name),
            None => new_name.to_string(),
        };
        info!("renamed {} -> {}", path, renamed);
        Ok(renamed)
    }

    /// Remove the node at `path` with its subtree.
    ///
    /// The root's path clears the whole tree. Every child of the parent that
    /// carries the final name is removed, so parsed duplicates go together.
    /// Returns whether anything was removed.
    pub fn remove_by_path(&mut self, path: &str) -> bool {
        let Some(root_name) = self.tree.root_name() else {
            return false;
        };
        if path == root_name {
            self.tree.clear();
            info!("removed root {}, tree is empty", path);
            return true;
        }

        let (Some(parent_path), name) = split_parent(path) else {
            return false;
        };
        let Some(parent) = self.tree.resolve(parent_path) else {
            return false;
        };
        let matches: Vec<Index> = self
            .tree
            .children(parent)
            .iter()
            .copied()
            .filter(|&c| self.tree.get_node(c).is_some_and(|n| n.name() == name))
            .collect();
        for idx in &matches {
            self.tree.remove_subtree(*idx);
        }
        if !matches.is_empty() {
            info!("removed {}", path);
        }
        !matches.is_empty()
    }

    /// Move the node at `source` (with its subtree) into the directory at
    /// `dest`. Returns the node's new path.
    pub fn move_node(&mut self, source: &str, dest: &str) -> EditResult<String> {
        if is_same_or_descendant(source, dest) {
            return Err(DomainError::InvalidMove {
                from: source.to_string(),
                to: dest.to_string(),
            });
        }
        let src = self.require(source)?;
        let dst = self.require(dest)?;
        if !self.is_directory(dst) {
            return Err(DomainError::InvalidOperation(format!(
                "cannot move into file '{}'",
                dest
            )));
        }

        let name = self
            .tree
            .get_node(src)
            .map(|n| n.name().to_string())
            .ok_or_else(|| DomainError::NotFound(source.to_string()))?;
        if self.tree.find_child(dst, &name).is_some() {
            return Err(DomainError::DuplicateName {
                parent: dest.to_string(),
                name,
            });
        }

        self.tree.move_subtree(src, dst)?;
        let moved = format!("{}/{}", dest, name);
        info!("moved {} -> {}", source, moved);
        Ok(moved)
    }

    fn require(&self, path: &str) -> EditResult<Index> {
        self.resolve(path)
            .ok_or_else(|| DomainError::NotFound(path.to_string()))
    }

    fn is_directory(&self, idx: Index) -> bool {
        self.tree.get_node(idx).is_some_and(TreeNode::is_directory)
    }
}

/// Names are single non-empty path segments the parser can read back:
/// no separator, no comment marker, no trailing backslash.
fn validate_name(name: &str) -> EditResult<&str> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || name.contains('#') || name.ends_with('\\') {
        return Err(DomainError::InvalidName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_names_when_validating_then_rejects_empty_and_separators() {
        assert_eq!(validate_name("  a.txt "), Ok("a.txt"));
        assert!(validate_name("   ").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("issue#12.md").is_err());
        assert!(validate_name("dir\\").is_err());
    }

    #[test]
    fn given_empty_session_when_removing_then_false() {
        let mut session = EditorSession::new();
        assert!(!session.remove_by_path("project"));
    }
}
