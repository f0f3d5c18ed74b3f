//! `termtree` rendering of structure trees.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::TreeArena;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

// Directories are labelled with a trailing slash
impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index) -> Tree<String> {
            let label = arena
                .get_node(node_idx)
                .map(|n| n.to_string())
                .unwrap_or_default();
            let leaves: Vec<_> = arena
                .children(node_idx)
                .iter()
                .map(|&child| build_tree(arena, child))
                .collect();
            Tree::new(label).with_leaves(leaves)
        }

        match self.root() {
            Some(root_idx) => build_tree(self, root_idx),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeKind;

    #[test]
    fn given_tree_then_renders_termtree_diagram() {
        let mut tree = TreeArena::with_root("project");
        let root = tree.root().unwrap();
        let src = tree.append_child(root, "src", NodeKind::Directory).unwrap();
        tree.append_child(src, "main.py", NodeKind::File).unwrap();
        tree.append_child(root, "README.md", NodeKind::File).unwrap();

        let rendered = tree.to_tree_string().to_string();

        assert!(rendered.starts_with("project/\n"));
        assert!(rendered.contains("src/"));
        assert!(rendered.contains("main.py"));
        assert!(rendered.contains("README.md"));
    }
}
