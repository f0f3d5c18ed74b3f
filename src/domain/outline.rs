//! Indented outline serializer, the inverse of the structure parser.

use crate::domain::arena::TreeArena;
use crate::domain::parser::infer_kind;

pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Render `tree` as structure text.
///
/// The root goes on the first line, every other node is indented by
/// `depth * indent_width` spaces, and directories carry a trailing `/` so
/// their kind survives re-parsing. An empty tree renders as an empty string.
pub fn to_outline(tree: &TreeArena, indent_width: usize) -> String {
    let width = indent_width.max(1);
    let mut out = String::new();
    for (_, node, depth) in tree.iter() {
        out.push_str(&" ".repeat(depth * width));
        out.push_str(&node.to_string());
        out.push('\n');
    }
    out
}

/// Paths of nodes that [`to_outline`] cannot write so that parsing restores
/// them: names carrying a comment marker, a trailing backslash or
/// surrounding whitespace, and files whose name reads as a directory
/// (no `.`). Empty when the outline round-trips.
pub fn unrepresentable_paths(tree: &TreeArena) -> Vec<String> {
    tree.iter()
        .skip(1)
        .filter(|(_, node, _)| {
            let name = node.name();
            name.contains('#')
                || name.contains("//")
                || name.ends_with('\\')
                || name.trim() != name
                || (!node.is_directory() && infer_kind(name).is_directory())
        })
        .filter_map(|(idx, _, _)| tree.path_of(idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeKind;

    #[test]
    fn given_nested_tree_then_renders_indented_lines() {
        let mut tree = TreeArena::with_root("project");
        let root = tree.root().unwrap();
        let src = tree.append_child(root, "src", NodeKind::Directory).unwrap();
        tree.append_child(src, "main.py", NodeKind::File).unwrap();
        tree.append_child(root, "README.md", NodeKind::File).unwrap();

        assert_eq!(
            to_outline(&tree, 2),
            "project/\n  src/\n    main.py\n  README.md\n"
        );
    }

    #[test]
    fn given_empty_tree_then_empty_outline() {
        assert_eq!(to_outline(&TreeArena::new(), 2), "");
    }

    #[test]
    fn given_dotless_file_and_comment_marker_then_reported_as_unrepresentable() {
        let mut tree = TreeArena::with_root("project");
        let root = tree.root().unwrap();
        let src = tree.append_child(root, "src", NodeKind::Directory).unwrap();
        tree.append_child(src, "issue#12.md", NodeKind::File).unwrap();
        tree.append_child(root, "Makefile", NodeKind::File).unwrap();
        tree.append_child(root, "v1.0", NodeKind::Directory).unwrap();

        assert_eq!(
            unrepresentable_paths(&tree),
            vec!["project/src/issue#12.md", "project/Makefile"]
        );
    }
}
