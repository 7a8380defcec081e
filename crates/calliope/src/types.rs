//! Domain types for the Calliope documentation model.
//!
//! These types represent the core domain model:
//! - **Extraction output**: `ClassDoc`, `FunctionDoc`, `Parameter` (per file,
//!   in discovery order)
//! - **Aggregated model**: `ClassRecord`, `FileRecord` (name-keyed maps;
//!   the path-keyed `ProjectModel` lives in the `project` module)
//! - **Results**: `GenerateStats` (run outcome)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Docstring | Always-present String | Absent docs carry the sentinel, so rendering never branches |
//! | Maps | `BTreeMap` | Output iterates keys lexicographically, independent of discovery order |
//! | async | Flag on `FunctionDoc` | One declaration kind; the flag has no effect on rendering |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FileError;

/// Placeholder recorded when a declaration carries no documentation.
///
/// The surrounding underscores render the placeholder in italics in the
/// output document.
pub const NO_DOCSTRING: &str = "_No docstring_";

/// A single declared parameter of a function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name as declared
    pub name: String,
    /// Type name, present only for simple named annotations (`x: int`).
    /// Compound annotations (generics, attributes, unions) are omitted.
    pub type_name: Option<String>,
}

/// A documented function or method.
///
/// Synchronous and asynchronous defs collapse into this one type; `is_async`
/// is recorded but does not influence the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDoc {
    /// Function name as declared
    pub name: String,
    /// Docstring, or [`NO_DOCSTRING`] when absent
    pub docstring: String,
    /// Declared parameters, receiver (`self`/`cls`) already stripped
    pub parameters: Vec<Parameter>,
    /// Return type name, present only for simple named annotations
    pub return_type: Option<String>,
    /// Whether the def was declared `async`
    pub is_async: bool,
}

/// A documented class, as discovered in one file.
///
/// Methods are collected in discovery order; the aggregation step folds them
/// into a name-keyed map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDoc {
    /// Class name as declared
    pub name: String,
    /// Docstring, or [`NO_DOCSTRING`] when absent
    pub docstring: String,
    /// Name of the first attribute-style base class, if any
    pub base: Option<String>,
    /// Functions whose nearest enclosing class is this one
    pub methods: Vec<FunctionDoc>,
}

/// Declarations extracted from a single source file, before aggregation.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Path relative to the project root
    pub relative_path: PathBuf,
    /// Every class found in the file, at any nesting depth
    pub classes: Vec<ClassDoc>,
    /// Every function with no enclosing class
    pub functions: Vec<FunctionDoc>,
}

/// Aggregated view of one class: methods keyed by name, last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Docstring, or [`NO_DOCSTRING`] when absent
    pub docstring: String,
    /// Name of the first attribute-style base class, if any
    pub base: Option<String>,
    /// Methods keyed by name
    pub methods: BTreeMap<String, FunctionDoc>,
}

/// Aggregated view of one file: classes and top-level functions by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Classes keyed by name
    pub classes: BTreeMap<String, ClassRecord>,
    /// Top-level functions keyed by name
    pub functions: BTreeMap<String, FunctionDoc>,
}

impl FileRecord {
    /// Whether the file has nothing to document.
    ///
    /// Empty records are dropped from the project model entirely.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty()
    }
}

/// Rendering configuration for the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Depth of the generated table of contents (`:toclevels:`)
    pub toclevels: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { toclevels: 3 }
    }
}

/// Statistics from a documentation run.
#[derive(Debug)]
pub struct GenerateStats {
    /// Eligible source files found under the project root
    pub files_scanned: usize,
    /// Files that contributed at least one class or function
    pub files_documented: usize,
    /// Classes found across all files
    pub classes_found: usize,
    /// Top-level functions found across all files
    pub functions_found: usize,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// Per-file errors encountered (the run still succeeded)
    pub errors: Vec<FileError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_record_empty_detection() {
        let record = FileRecord::default();
        assert!(record.is_empty());

        let mut with_function = FileRecord::default();
        with_function.functions.insert(
            "main".to_string(),
            FunctionDoc {
                name: "main".to_string(),
                docstring: NO_DOCSTRING.to_string(),
                parameters: vec![],
                return_type: None,
                is_async: false,
            },
        );
        assert!(!with_function.is_empty());
    }

    #[test]
    fn render_config_defaults_to_three_levels() {
        assert_eq!(RenderConfig::default().toclevels, 3);
    }
}
