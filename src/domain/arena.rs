//! Arena-backed structure tree.
//!
//! Nodes live in a generational arena and reference each other by `Index`.
//! Handles are internal; callers outside the domain address nodes by path
//! (see [`crate::domain::path`]).

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::error::DomainError;

/// Kind of a structure entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    pub fn is_directory(self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => write!(f, "directory"),
            NodeKind::File => write!(f, "file"),
        }
    }
}

/// Tree node in the arena-based structure.
///
/// A directory always holds a child list (possibly empty); a file never
/// does. The kind is derived from that container and cannot change after
/// construction.
#[derive(Debug, Clone)]
pub struct TreeNode {
    name: String,
    parent: Option<Index>,
    children: Option<Vec<Index>>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: match kind {
                NodeKind::Directory => Some(Vec::new()),
                NodeKind::File => None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        if self.children.is_some() {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    pub fn is_directory(&self) -> bool {
        self.children.is_some()
    }

    /// Index of the parent node, None for the root
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    /// Child indices in insertion order. Files yield an empty slice.
    pub fn children(&self) -> &[Index] {
        self.children.as_deref().unwrap_or(&[])
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_directory() {
            write!(f, "{}/", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Arena-based tree holding one directory structure.
///
/// The root is always a directory. An empty arena (no root) is the result of
/// removing the root.
#[derive(Debug, Clone)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Create a tree consisting of a single root directory.
    pub fn with_root(name: impl Into<String>) -> Self {
        let mut tree = Self::new();
        let idx = tree.arena.insert(TreeNode::new(name, NodeKind::Directory));
        tree.root = Some(idx);
        tree
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Child indices of `idx`; empty for files and stale handles.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena.get(idx).map(TreeNode::children).unwrap_or(&[])
    }

    /// First child of `parent` named `name`.
    pub fn find_child(&self, parent: Index, name: &str) -> Option<Index> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.arena.get(child).is_some_and(|n| n.name == name))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Append a new node as the last child of `parent`.
    ///
    /// Fails with `InvalidOperation` when `parent` is a file.
    #[instrument(level = "trace", skip_all)]
    pub fn append_child(
        &mut self,
        parent: Index,
        name: impl AsRef<str>,
        kind: NodeKind,
    ) -> Result<Index, DomainError> {
        let parent_node = self
            .arena
            .get(parent)
            .ok_or_else(|| DomainError::NotFound(format!("parent of '{}'", name.as_ref())))?;
        if !parent_node.is_directory() {
            return Err(DomainError::InvalidOperation(format!(
                "cannot add '{}' to file '{}'",
                name.as_ref(),
                parent_node.name
            )));
        }

        let mut node = TreeNode::new(name.as_ref(), kind);
        node.parent = Some(parent);
        let idx = self.arena.insert(node);
        if let Some(children) = self.arena.get_mut(parent).and_then(|p| p.children.as_mut()) {
            children.push(idx);
        }
        Ok(idx)
    }

    /// Change the name of a node in place. Sibling uniqueness is not checked.
    pub fn set_name(&mut self, idx: Index, name: impl Into<String>) -> Result<(), DomainError> {
        let node = self
            .arena
            .get_mut(idx)
            .ok_or_else(|| DomainError::NotFound("node handle".to_string()))?;
        node.name = name.into();
        Ok(())
    }

    /// True if `idx` is `ancestor` or lies below it.
    pub fn is_within(&self, idx: Index, ancestor: Index) -> bool {
        let mut current = Some(idx);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.arena.get(c).and_then(|n| n.parent);
        }
        false
    }

    /// Re-parent `idx` (with its subtree) as the last child of `new_parent`.
    ///
    /// All checks run before anything is changed.
    #[instrument(level = "trace", skip(self))]
    pub fn move_subtree(&mut self, idx: Index, new_parent: Index) -> Result<(), DomainError> {
        let node = self
            .arena
            .get(idx)
            .ok_or_else(|| DomainError::NotFound("node handle".to_string()))?;
        let old_parent = node.parent.ok_or_else(|| {
            DomainError::InvalidOperation(format!("cannot move root '{}'", node.name))
        })?;
        let target = self
            .arena
            .get(new_parent)
            .ok_or_else(|| DomainError::NotFound("destination handle".to_string()))?;
        if !target.is_directory() {
            return Err(DomainError::InvalidOperation(format!(
                "cannot move into file '{}'",
                target.name
            )));
        }
        if self.is_within(new_parent, idx) {
            return Err(DomainError::InvalidMove {
                from: self.path_of(idx).unwrap_or_default(),
                to: self.path_of(new_parent).unwrap_or_default(),
            });
        }

        if let Some(children) = self.arena.get_mut(old_parent).and_then(|p| p.children.as_mut()) {
            children.retain(|&c| c != idx);
        }
        if let Some(children) = self.arena.get_mut(new_parent).and_then(|p| p.children.as_mut()) {
            children.push(idx);
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }

    /// Detach `idx` from its parent and free it together with its subtree.
    ///
    /// Removing the root empties the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> bool {
        let Some(parent) = self.arena.get(idx).map(|n| n.parent) else {
            return false;
        };
        let Some(parent) = parent else {
            self.clear();
            return true;
        };
        if let Some(children) = self.arena.get_mut(parent).and_then(|p| p.children.as_mut()) {
            children.retain(|&c| c != idx);
        }

        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.arena.remove(current) {
                trace!("freed node '{}'", removed.name);
                stack.extend(removed.children());
            }
        }
        true
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Pre-order traversal yielding `(index, node, depth)`; the root has depth 0.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

}

/// Structural equality: same names, kinds and child order. Handles are ignored.
impl PartialEq for TreeArena {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|((_, a, da), (_, b, db))| {
                da == db && a.name == b.name && a.kind() == b.kind()
            })
    }
}

impl Eq for TreeArena {}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, 0));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_file_node_when_appending_child_then_invalid_operation() {
        let mut tree = TreeArena::with_root("project");
        let root = tree.root().unwrap();
        let file = tree.append_child(root, "main.py", NodeKind::File).unwrap();

        let result = tree.append_child(file, "nested", NodeKind::Directory);

        assert!(matches!(result, Err(DomainError::InvalidOperation(_))));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn given_new_nodes_then_kind_follows_children_container() {
        assert!(TreeNode::new("src", NodeKind::Directory).children.is_some());
        assert!(TreeNode::new("a.txt", NodeKind::File).children.is_none());
        assert_eq!(TreeNode::new("a.txt", NodeKind::File).kind(), NodeKind::File);
    }

    #[test]
    fn given_nested_tree_when_removing_subtree_then_frees_descendants() {
        let mut tree = TreeArena::with_root("project");
        let root = tree.root().unwrap();
        let src = tree.append_child(root, "src", NodeKind::Directory).unwrap();
        let lib = tree.append_child(src, "lib.rs", NodeKind::File).unwrap();
        tree.append_child(root, "README.md", NodeKind::File).unwrap();

        assert!(tree.remove_subtree(src));

        assert_eq!(tree.len(), 2);
        assert!(tree.get_node(lib).is_none());
        assert_eq!(tree.children(root).len(), 1);
    }
}
