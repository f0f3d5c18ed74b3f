//! Tests for script generation

use rstest::{fixture, rstest};

use dirsketch::application::{generate_script, ApplicationError, ScriptFormat};
use dirsketch::domain::{parse_structure, ParseOptions, TreeArena};
use dirsketch::util::testing;

#[fixture]
fn tree() -> TreeArena {
    testing::init_test_setup();
    parse_structure(
        "project\n  src/\n    main.py\n  README.md\n",
        &ParseOptions::default(),
    )
    .unwrap()
}

// ============================================================
// Per-format output
// ============================================================

#[rstest]
fn given_tree_when_emitting_shell_then_creates_entries_under_root(tree: TreeArena) {
    // Act
    let script = generate_script(&tree, ScriptFormat::Shell).unwrap();

    // Assert
    let expected = "\
#!/bin/bash
if [ -d \"project\" ]; then
  echo \"Directory project already exists.\"
  exit 1
fi
mkdir -p \"project\"
cd \"project\" || exit 1

mkdir -p \"src\"
touch \"src/main.py\"
touch \"README.md\"

echo \"Project structure created successfully.\"
cd ..
";
    assert_eq!(script, expected);
}

#[rstest]
fn given_tree_when_emitting_python_then_uses_pathlib(tree: TreeArena) {
    let script = generate_script(&tree, ScriptFormat::Python).unwrap();

    let expected = "\
from pathlib import Path

root_dir = Path(\"project\")
root_dir.mkdir(exist_ok=True)

(root_dir / \"src\").mkdir()
(root_dir / \"src/main.py\").touch()
(root_dir / \"README.md\").touch()

print(\"Project structure created successfully.\")
";
    assert_eq!(script, expected);
}

#[rstest]
fn given_tree_when_emitting_batch_then_uses_backslash_paths(tree: TreeArena) {
    let script = generate_script(&tree, ScriptFormat::Batch).unwrap();

    let expected = "\
@echo off
if exist \"project\" (
  echo Directory project already exists.
  exit /b 1
)
mkdir \"project\"
cd \"project\"

mkdir \"src\"
type nul > \"src\\main.py\"
type nul > \"README.md\"

echo Project structure created successfully.
cd ..
";
    assert_eq!(script, expected);
}

// ============================================================
// Ordering and edge cases
// ============================================================

#[rstest]
#[case(ScriptFormat::Python)]
#[case(ScriptFormat::Batch)]
#[case(ScriptFormat::Shell)]
fn given_nested_directories_when_emitting_then_parents_precede_children(
    #[case] format: ScriptFormat,
) {
    let tree = parse_structure(
        "root\n  a\n    b\n      deep.txt\n  c.txt\n",
        &ParseOptions::default(),
    )
    .unwrap();

    let script = generate_script(&tree, format).unwrap();

    let pos = |needle: &str| script.find(needle).unwrap_or_else(|| panic!("{needle} missing"));
    let a = pos("\"a\"");
    let b = pos(if format == ScriptFormat::Batch { "a\\b\"" } else { "a/b\"" });
    let deep = pos("deep.txt");
    let c = pos("c.txt");
    assert!(a < b && b < deep && deep < c, "{script}");
}

#[rstest]
#[case(ScriptFormat::Python)]
#[case(ScriptFormat::Batch)]
#[case(ScriptFormat::Shell)]
fn given_root_only_tree_when_emitting_then_only_header_and_footer(#[case] format: ScriptFormat) {
    let tree = TreeArena::with_root("solo");

    let script = generate_script(&tree, format).unwrap();

    assert!(script.contains("solo"));
    assert!(script.contains("Project structure created successfully."));
    assert!(!script.contains("touch"));
    assert!(!script.contains("type nul"));
}

#[test]
fn given_empty_tree_when_emitting_then_no_tree_error() {
    let result = generate_script(&TreeArena::new(), ScriptFormat::Python);

    assert!(matches!(result, Err(ApplicationError::NoTree)));
}

#[test]
fn given_shell_metacharacters_in_name_when_emitting_then_escapes_them() {
    let tree = parse_structure("p\n  $HOME.txt\n", &ParseOptions::default()).unwrap();

    let script = generate_script(&tree, ScriptFormat::Shell).unwrap();

    assert!(script.contains("touch \"\\$HOME.txt\""), "{script}");
}

#[test]
fn given_same_tree_when_emitting_twice_then_output_is_identical() {
    let tree = parse_structure("p\n  a/\n    b.txt\n", &ParseOptions::default()).unwrap();

    let first = generate_script(&tree, ScriptFormat::Python).unwrap();
    let second = generate_script(&tree, ScriptFormat::Python).unwrap();

    assert_eq!(first, second);
}
