//! Tests for the structure-text parser

use rstest::rstest;

use dirsketch::domain::{
    parse_line, parse_structure, to_outline, NodeKind, ParseOptions, TreeArena,
};
use dirsketch::util::testing;

/// Pre-order `(depth, name, kind)` listing for compact assertions.
fn shape(tree: &TreeArena) -> Vec<(usize, String, NodeKind)> {
    tree.iter()
        .map(|(_, node, depth)| (depth, node.name().to_string(), node.kind()))
        .collect()
}

fn parse(text: &str) -> TreeArena {
    testing::init_test_setup();
    parse_structure(text, &ParseOptions::default()).expect("structure should parse")
}

use dirsketch::domain::NodeKind::{Directory as D, File as F};

fn entry(depth: usize, name: &str, kind: NodeKind) -> (usize, String, NodeKind) {
    (depth, name.to_string(), kind)
}

// ============================================================
// Basic structure
// ============================================================

#[test]
fn given_indented_example_when_parsing_then_builds_nested_tree() {
    // Arrange
    let text = "project\n  src/\n    main.py\n  README.md\n";

    // Act
    let tree = parse(text);

    // Assert
    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "project", D),
            entry(1, "src", D),
            entry(2, "main.py", F),
            entry(1, "README.md", F),
        ]
    );
    let src = tree.resolve("project/src").unwrap();
    assert_eq!(tree.children(src).len(), 1);
}

#[test]
fn given_box_drawing_listing_when_parsing_then_glyphs_drive_nesting() {
    let text = "\
my-app/
├── src/
│   ├── main.rs
│   └── lib.rs
├── Cargo.toml
└── README.md
";

    let tree = parse(text);

    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "my-app", D),
            entry(1, "src", D),
            entry(2, "main.rs", F),
            entry(2, "lib.rs", F),
            entry(1, "Cargo.toml", F),
            entry(1, "README.md", F),
        ]
    );
}

#[test]
fn given_tabs_when_parsing_then_expands_before_measuring() {
    let tree = parse("root\n\tsrc\n\t\tmain.c\n\tdocs\n");

    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "root", D),
            entry(1, "src", D),
            entry(2, "main.c", F),
            entry(1, "docs", D),
        ]
    );
}

#[test]
fn given_dedent_past_several_levels_when_parsing_then_pops_to_matching_ancestor() {
    let tree = parse("root\n  a\n    b\n      c.txt\n  d.txt\n");

    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "root", D),
            entry(1, "a", D),
            entry(2, "b", D),
            entry(3, "c.txt", F),
            entry(1, "d.txt", F),
        ]
    );
}

#[test]
fn given_inconsistent_indentation_when_parsing_then_uses_literal_widths() {
    // c (4) is deeper than a (2) but shallower than b (5): it lands under a.
    let tree = parse("root\n  a\n     b\n    c\n");

    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "root", D),
            entry(1, "a", D),
            entry(2, "b", D),
            entry(2, "c", D),
        ]
    );
}

#[test]
fn given_file_followed_by_deeper_line_when_parsing_then_deeper_line_is_sibling() {
    // Files are never pushed as ancestors.
    let tree = parse("root\n  notes.txt\n    inner.txt\n");

    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "root", D),
            entry(1, "notes.txt", F),
            entry(1, "inner.txt", F),
        ]
    );
}

// ============================================================
// Kind inference
// ============================================================

#[rstest]
#[case("  src", "src", D)]
#[case("  src/", "src", D)]
#[case("  src\\", "src", D)]
#[case("  main.py", "main.py", F)]
#[case("  a.", "a.", F)]
#[case("  .gitignore", ".gitignore", F)]
#[case("  Makefile", "Makefile", D)]
#[case("  v1.0/", "v1.0", D)]
#[case("  config.json # settings file", "config.json", F)]
#[case("  build // generated", "build", D)]
fn given_entry_line_when_parsing_then_infers_name_and_kind(
    #[case] line: &str,
    #[case] name: &str,
    #[case] kind: NodeKind,
) {
    let parsed = parse_line(line, 4).expect("line should carry an entry");

    assert_eq!(parsed.name, name);
    assert_eq!(parsed.kind, kind);
    assert_eq!(parsed.indent, 2);
}

// ============================================================
// Comments and blank lines
// ============================================================

#[test]
fn given_leading_and_inline_comments_when_parsing_then_ignores_them() {
    let text = "\
# generated layout
project

// sources
  src # code lives here
    app.py // entry point
  ├── # nothing but a comment
";

    let tree = parse(text);

    assert_eq!(
        shape(&tree),
        vec![
            entry(0, "project", D),
            entry(1, "src", D),
            entry(2, "app.py", F),
        ]
    );
}

#[test]
fn given_hash_before_slashes_when_parsing_then_cuts_at_hash() {
    let tree = parse("p\n  a.txt # see http://example.com\n");

    let node = tree.resolve("p/a.txt").and_then(|i| tree.get_node(i)).unwrap();
    assert_eq!(node.kind(), F);
}

#[rstest]
#[case("")]
#[case("\n   \n\t\n")]
#[case("# only comments\n// and more\n")]
fn given_no_usable_lines_when_parsing_then_none(#[case] text: &str) {
    assert!(parse_structure(text, &ParseOptions::default()).is_none());
}

// ============================================================
// Root line
// ============================================================

#[rstest]
#[case("project/", "project")]
#[case("project\\", "project")]
#[case("  spaced  ", "spaced")]
#[case(".", "project")]
#[case("./", "project")]
fn given_root_line_when_parsing_then_normalizes_root_name(#[case] line: &str, #[case] root: &str) {
    let tree = parse(line);

    assert_eq!(tree.root_name(), Some(root));
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_dot_root_and_custom_default_when_parsing_then_uses_configured_name() {
    let options = ParseOptions {
        default_root_name: "workspace".to_string(),
        ..ParseOptions::default()
    };

    let tree = parse_structure(".\n  src\n", &options).unwrap();

    assert_eq!(tree.root_name(), Some("workspace"));
    assert!(tree.resolve("workspace/src").is_some());
}

#[test]
fn given_duplicate_siblings_when_parsing_then_keeps_both() {
    let tree = parse("p\n  a.txt\n  a.txt\n");

    let root = tree.root().unwrap();
    assert_eq!(tree.children(root).len(), 2);
}

// ============================================================
// Round trip through the outline serializer
// ============================================================

#[rstest]
#[case("project\n  src/\n    main.py\n  README.md\n")]
#[case("my-app/\n├── src/\n│   ├── main.rs\n│   └── lib.rs\n└── README.md\n")]
#[case("root\n\ta\n\t\tb\n\t\t\tc.txt\n\td\n")]
#[case(".\n  empty/\n  docs\n    guide.md\n  .env\n")]
fn given_structure_when_reparsing_outline_then_trees_are_equal(#[case] text: &str) {
    let first = parse(text);

    for width in [1, 2, 4] {
        let second = parse(&to_outline(&first, width));
        assert_eq!(first, second, "outline width {}", width);
    }
}
