//! # Calliope: Docstring Overview Generator
//!
//! Calliope scans a Python project, extracts classes, functions and methods
//! together with their docstrings, parameter lists, return-type hints and
//! base classes, and writes a single AsciiDoc document describing the
//! project.
//!
//! ## Design Philosophy
//!
//! - **Best effort** - one malformed file never aborts the run; it simply
//!   contributes nothing
//! - **Deterministic** - files may be parsed in parallel, but the model and
//!   the document are keyed through sorted maps, so output is byte-identical
//!   across runs
//! - **Explicit state** - the project model is a value built once per run
//!   and discarded after rendering; nothing persists
//! - **Embeddable** - library first, CLI second
//!
//! ## Quick Start
//!
//! ```no_run
//! use calliope::Calliope;
//! use std::path::Path;
//!
//! let calliope = Calliope::new(Path::new("/path/to/project"))?;
//! let stats = calliope.generate()?;
//! println!(
//!     "documented {} of {} files",
//!     stats.files_documented, stats.files_scanned
//! );
//! # Ok::<(), calliope::Error>(())
//! ```

mod error;
mod parser;
mod project;
mod python;
mod render;
mod types;

pub use error::{Error, FileError, FileErrorKind, Result};
pub use project::ProjectModel;
pub use types::{
    ClassDoc, ClassRecord, FileAnalysis, FileRecord, FunctionDoc, GenerateStats, Parameter,
    RenderConfig, NO_DOCSTRING,
};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use parser::PythonParser;

/// Default name of the generated document, created under the project root.
pub const OUTPUT_FILE_NAME: &str = "docstrings_doc.adoc";

/// Filenames never scanned, regardless of location.
const DEFAULT_EXCLUDED_FILES: [&str; 2] = ["__init__.py", "__manifest__.py"];

/// Docstring documentation generator.
///
/// `Calliope` is the main entry point. It discovers eligible `.py` files
/// under a project root, extracts declarations from each, aggregates them
/// into a project model and renders the AsciiDoc document.
pub struct Calliope {
    project_root: PathBuf,
    output_path: PathBuf,
    config: RenderConfig,
    excluded_files: BTreeSet<String>,
}

impl Calliope {
    /// Create a generator for a project.
    ///
    /// Uses convention-based defaults:
    /// - Output written to `<root>/docstrings_doc.adoc`
    /// - `__init__.py` and `__manifest__.py` excluded from scanning
    /// - Hidden directories and common generated directories
    ///   (`__pycache__`, `venv`, `build`, ...) skipped
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the project root does not exist.
    pub fn new(project_root: &Path) -> Result<Self> {
        let project_root = project_root.canonicalize().map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("project root not found: {}", project_root.display()),
            ))
        })?;

        let output_path = project_root.join(OUTPUT_FILE_NAME);

        Ok(Self {
            project_root,
            output_path,
            config: RenderConfig::default(),
            excluded_files: DEFAULT_EXCLUDED_FILES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        })
    }

    /// Set the table-of-contents depth of the generated document.
    #[must_use]
    pub fn with_toclevels(mut self, toclevels: u32) -> Self {
        self.config.toclevels = toclevels;
        self
    }

    /// Write the document somewhere other than the default location.
    #[must_use]
    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }

    /// Exclude an additional filename from scanning.
    #[must_use]
    pub fn exclude_file(mut self, name: impl Into<String>) -> Self {
        self.excluded_files.insert(name.into());
        self
    }

    /// Path the document will be written to.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run the whole pipeline: discover, extract, aggregate, render, write.
    ///
    /// Files are read and parsed in parallel; results are folded into the
    /// model sequentially. Per-file failures are collected into the returned
    /// stats and never abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] only when the document cannot be written.
    pub fn generate(&self) -> Result<GenerateStats> {
        let start = Instant::now();

        let files = self.discover_files()?;
        let files_scanned = files.len();
        debug!(files = files_scanned, "Discovered eligible source files");

        // Phase 1 (parallel): read + parse + extract, one parser per task.
        let results: Vec<std::result::Result<FileAnalysis, FileError>> = files
            .par_iter()
            .map(|path| Self::extract_file(&self.project_root, path))
            .collect();

        // Phase 2 (sequential): fold into the model.
        let mut model = ProjectModel::default();
        let mut errors = Vec::new();
        let mut classes_found = 0;
        let mut functions_found = 0;
        for result in results {
            match result {
                Ok(analysis) => {
                    classes_found += analysis.classes.len();
                    functions_found += analysis.functions.len();
                    model.add_file(analysis);
                }
                Err(e) => {
                    warn!(file = %e.path.display(), error = %e.message, "Skipping file");
                    errors.push(e);
                }
            }
        }

        let document = render::render(&model, &self.config);
        std::fs::write(&self.output_path, document)?;
        debug!(
            output = %self.output_path.display(),
            files = model.len(),
            "Document written"
        );

        Ok(GenerateStats {
            files_scanned,
            files_documented: model.len(),
            classes_found,
            functions_found,
            duration: start.elapsed(),
            errors,
        })
    }

    /// Read, parse and extract a single file.
    ///
    /// Owns its parser so the caller can fan files out across threads.
    fn extract_file(
        root: &Path,
        path: &Path,
    ) -> std::result::Result<FileAnalysis, FileError> {
        let content =
            std::fs::read(path).map_err(|e| FileError::io_error(path.to_path_buf(), &e))?;
        let Ok(source) = std::str::from_utf8(&content) else {
            return Err(FileError::encoding_error(path.to_path_buf()));
        };

        let mut parser = PythonParser::new().map_err(|e| {
            FileError::parse_failed(path.to_path_buf(), format!("parser unavailable: {e}"))
        })?;
        let tree = parser.parse(source, path)?;

        let (classes, functions) = python::extract_declarations(&tree, source.as_bytes());

        Ok(FileAnalysis {
            relative_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            classes,
            functions,
        })
    }

    /// Discover eligible source files under the project root.
    fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk_dir(&self.project_root, &mut files)?;
        Ok(files)
    }

    /// Recursively walk a directory, collecting `.py` files.
    ///
    /// Directories that cannot be read (e.g., due to permissions) are logged
    /// and skipped.
    fn walk_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Cannot read directory, skipping"
                );
                return Ok(());
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(
                        directory = %dir.display(),
                        error = %e,
                        "Failed to read directory entry, skipping"
                    );
                    continue;
                }
            };

            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if path.is_dir() {
                if name.starts_with('.') || Self::is_excluded_dir(name) {
                    continue;
                }
                self.walk_dir(&path, files)?;
            } else if path.is_file()
                && name.ends_with(".py")
                && !self.excluded_files.contains(name)
            {
                files.push(path);
            }
        }

        Ok(())
    }

    /// Check if a directory should be excluded from scanning.
    fn is_excluded_dir(name: &str) -> bool {
        matches!(
            name,
            "__pycache__" | "venv" | "env" | "node_modules" | "build" | "dist" | "site-packages"
        )
    }
}
