//! Domain layer: the structure tree and its parser
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod error;
pub mod outline;
pub mod parser;
pub mod path;

pub use arena::{NodeKind, TreeArena, TreeNode};
pub use display::TreeNodeConvert;
pub use error::DomainError;
pub use outline::{to_outline, unrepresentable_paths, DEFAULT_INDENT_WIDTH};
pub use parser::{parse_line, parse_structure, LineEntry, ParseOptions, StructureParser};
