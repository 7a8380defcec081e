//! Project-wide aggregation of per-file extraction results.
//!
//! Folds the discovery-order declaration lists of each file into name-keyed
//! records and collects them into one path-keyed model. The maps are
//! BTreeMaps, so every iteration the renderer performs is lexicographic and
//! independent of discovery or completion order.
//!
//! Merging is independent per file; same-named entries overwrite
//! (last-write-wins), which also means a re-declared class replaces the
//! earlier one wholesale, methods included. Files with nothing to document
//! are dropped from the model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{ClassDoc, ClassRecord, FileAnalysis, FileRecord, FunctionDoc};

/// The aggregated, render-ready model of a whole project.
///
/// Built once per run as an explicit value and discarded after rendering;
/// nothing persists across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// One record per documentable file, keyed by path relative to the root
    pub files: BTreeMap<PathBuf, FileRecord>,
}

impl ProjectModel {
    /// Fold one file's extraction result into the model.
    ///
    /// Files whose record ends up with no classes and no functions are not
    /// inserted at all.
    pub fn add_file(&mut self, analysis: FileAnalysis) {
        let record = fold_file(analysis.classes, analysis.functions);
        if record.is_empty() {
            return;
        }
        self.files.insert(analysis.relative_path, record);
    }

    /// Number of documentable files in the model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file contributed any declaration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Fold per-file declaration lists into a name-keyed [`FileRecord`].
fn fold_file(classes: Vec<ClassDoc>, functions: Vec<FunctionDoc>) -> FileRecord {
    let mut record = FileRecord::default();

    for class in classes {
        let mut methods = BTreeMap::new();
        for method in class.methods {
            methods.insert(method.name.clone(), method);
        }
        record.classes.insert(
            class.name,
            ClassRecord {
                docstring: class.docstring,
                base: class.base,
                methods,
            },
        );
    }

    for function in functions {
        record.functions.insert(function.name.clone(), function);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FunctionDoc, NO_DOCSTRING};

    fn function(name: &str, docstring: &str) -> FunctionDoc {
        FunctionDoc {
            name: name.to_string(),
            docstring: docstring.to_string(),
            parameters: vec![],
            return_type: None,
            is_async: false,
        }
    }

    fn class(name: &str, methods: Vec<FunctionDoc>) -> ClassDoc {
        ClassDoc {
            name: name.to_string(),
            docstring: NO_DOCSTRING.to_string(),
            base: None,
            methods,
        }
    }

    #[test]
    fn empty_analysis_is_dropped() {
        let mut model = ProjectModel::default();
        model.add_file(FileAnalysis {
            relative_path: PathBuf::from("empty.py"),
            classes: vec![],
            functions: vec![],
        });

        assert!(model.is_empty());
    }

    #[test]
    fn duplicate_function_names_keep_the_last() {
        let mut model = ProjectModel::default();
        model.add_file(FileAnalysis {
            relative_path: PathBuf::from("dup.py"),
            classes: vec![],
            functions: vec![function("run", "first"), function("run", "second")],
        });

        let record = &model.files[&PathBuf::from("dup.py")];
        assert_eq!(record.functions.len(), 1);
        assert_eq!(record.functions["run"].docstring, "second");
    }

    #[test]
    fn duplicate_class_replaces_methods_wholesale() {
        let mut model = ProjectModel::default();
        model.add_file(FileAnalysis {
            relative_path: PathBuf::from("dup.py"),
            classes: vec![
                class("Widget", vec![function("old_method", "gone")]),
                class("Widget", vec![function("new_method", "kept")]),
            ],
            functions: vec![],
        });

        let record = &model.files[&PathBuf::from("dup.py")];
        let widget = &record.classes["Widget"];
        assert_eq!(widget.methods.len(), 1);
        assert!(widget.methods.contains_key("new_method"));
    }

    #[test]
    fn files_iterate_in_path_order() {
        let mut model = ProjectModel::default();
        for name in ["zeta.py", "alpha.py", "midway.py"] {
            model.add_file(FileAnalysis {
                relative_path: PathBuf::from(name),
                classes: vec![],
                functions: vec![function("f", "doc")],
            });
        }

        let paths: Vec<&PathBuf> = model.files.keys().collect();
        assert_eq!(
            paths,
            vec![
                &PathBuf::from("alpha.py"),
                &PathBuf::from("midway.py"),
                &PathBuf::from("zeta.py")
            ]
        );
    }
}
