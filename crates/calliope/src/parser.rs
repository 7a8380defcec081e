//! Tree-sitter parsing coordination.
//!
//! Wraps a `tree_sitter::Parser` configured with the Python grammar and
//! defines what "parse failure" means for this tool.
//!
//! ## Design
//!
//! Tree-sitter is error-tolerant: it always produces a tree, marking
//! malformed regions with error nodes. Extraction wants all-or-nothing per
//! file, so a tree whose root contains any syntax error is treated as a
//! failed parse and the file contributes nothing to the document. Grammar
//! loading is the only infrastructure failure; it halts the run.
//!
//! Parsers are stateful and not shareable across threads, so each worker
//! owns its own `PythonParser`.

use std::path::Path;

use crate::error::{Error, FileError, Result};

/// A parser for Python source files.
pub struct PythonParser {
    parser: tree_sitter::Parser,
}

impl PythonParser {
    /// Create a parser with the Python grammar loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parser`] if the grammar version is incompatible with
    /// the linked tree-sitter runtime.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| Error::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse one file's source text into a syntax tree.
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] of kind `ParseFailed` when the parser bails
    /// out entirely or the resulting tree contains syntax errors. The error
    /// is scoped to `path`; callers collect it and continue with other files.
    pub fn parse(
        &mut self,
        source: &str,
        path: &Path,
    ) -> std::result::Result<tree_sitter::Tree, FileError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            FileError::parse_failed(path.to_path_buf(), "parser produced no tree")
        })?;

        if tree.root_node().has_error() {
            return Err(FileError::parse_failed(
                path.to_path_buf(),
                "source contains syntax errors",
            ));
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileErrorKind;
    use std::path::PathBuf;

    #[test]
    fn parses_valid_python() {
        let mut parser = PythonParser::new().expect("grammar should load");
        let tree = parser.parse("def hello():\n    pass\n", Path::new("a.py"));

        assert!(tree.is_ok());
    }

    #[test]
    fn rejects_malformed_python() {
        let mut parser = PythonParser::new().expect("grammar should load");
        let result = parser.parse("def broken(:\n", Path::new("broken.py"));

        let err = result.expect_err("syntax errors should fail the file");
        assert_eq!(err.kind, FileErrorKind::ParseFailed);
        assert_eq!(err.path, PathBuf::from("broken.py"));
    }

    #[test]
    fn empty_source_is_a_valid_parse() {
        let mut parser = PythonParser::new().expect("grammar should load");
        let tree = parser.parse("", Path::new("empty.py"));

        assert!(tree.is_ok());
    }
}
