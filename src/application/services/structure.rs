//! Structure loading and output service
//!
//! Reads structure text, parses it with the configured options, and writes
//! outlines and generated scripts back through the filesystem boundary.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::script::{generate_script, ScriptFormat};
use crate::application::{ApplicationError, ApplicationResult, EditorSession, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    to_outline, unrepresentable_paths, ParseOptions, StructureParser, TreeArena,
};
use crate::infrastructure::traits::FileSystem;

/// Service for turning structure text into trees and trees into files.
pub struct StructureService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl StructureService {
    /// Create a new structure service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            default_root_name: self.settings.default_root_name.clone(),
            tab_width: self.settings.tab_width,
        }
    }

    /// Parse structure text; text without usable lines is an error here.
    pub fn parse(&self, text: &str) -> ApplicationResult<TreeArena> {
        StructureParser::new(self.parse_options())
            .parse(text)
            .ok_or(ApplicationError::EmptyStructure)
    }

    /// Read and parse a structure file.
    pub fn load_file(&self, path: &Path) -> ApplicationResult<TreeArena> {
        debug!("load_file: {}", path.display());
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read structure", path)?;
        self.parse(&text)
    }

    /// Start an editing session on parsed text.
    pub fn open_session(&self, text: &str) -> ApplicationResult<EditorSession> {
        self.parse(text).map(EditorSession::from_tree)
    }

    pub fn outline(&self, tree: &TreeArena) -> String {
        to_outline(tree, self.settings.indent_width)
    }

    /// Write `tree` as an outline to `path`.
    ///
    /// Refuses, without writing, when some entry would not parse back
    /// unchanged.
    pub fn save_outline(&self, path: &Path, tree: &TreeArena) -> ApplicationResult<()> {
        let lossy = unrepresentable_paths(tree);
        if !lossy.is_empty() {
            return Err(ApplicationError::LossyOutline(lossy));
        }
        self.write_output(path, &self.outline(tree))
    }

    /// Generate a script, falling back to the configured format.
    pub fn script(
        &self,
        tree: &TreeArena,
        format: Option<ScriptFormat>,
    ) -> ApplicationResult<String> {
        generate_script(tree, format.unwrap_or(self.settings.script_format))
    }

    /// Write generated content, creating the parent directory if needed.
    pub fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs
                    .create_dir_all(parent)
                    .with_path_context("create directory", parent)?;
            }
        }
        self.fs
            .write(path, content)
            .with_path_context("write output", path)?;
        info!("wrote {}", path.display());
        Ok(())
    }
}
