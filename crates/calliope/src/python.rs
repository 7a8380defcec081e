//! Python declaration extraction.
//!
//! Walks a tree-sitter syntax tree and produces the per-file collections of
//! class and function declarations, with docstrings, parameter lists,
//! return-type hints and base classes.
//!
//! ## Method/class association
//!
//! The nearest enclosing class owns a function: the walk threads the current
//! class (an index into the growing class list) through recursion, so
//! containment is decided in a single top-down pass. A def nested inside a
//! method still belongs to the method's class; a nested class replaces the
//! context for its own body. Class bodies never overlap, so at most one
//! owner exists.

use tree_sitter::Node;

use crate::types::{ClassDoc, FunctionDoc, Parameter, NO_DOCSTRING};

/// Tree-sitter node kind constants for the Python grammar.
///
/// These match the node types defined in tree-sitter-python. Using constants
/// prevents typos and makes supported node types explicit.
mod node_kinds {
    // Declarations
    pub const CLASS_DEFINITION: &str = "class_definition";
    pub const FUNCTION_DEFINITION: &str = "function_definition";

    // Statements & literals
    pub const EXPRESSION_STATEMENT: &str = "expression_statement";
    pub const STRING: &str = "string";
    pub const STRING_START: &str = "string_start";
    pub const STRING_END: &str = "string_end";
    pub const COMMENT: &str = "comment";

    // Expressions
    pub const IDENTIFIER: &str = "identifier";
    pub const ATTRIBUTE: &str = "attribute";
    pub const KEYWORD_ARGUMENT: &str = "keyword_argument";

    // Parameters & annotations
    pub const TYPED_PARAMETER: &str = "typed_parameter";
    pub const DEFAULT_PARAMETER: &str = "default_parameter";
    pub const TYPED_DEFAULT_PARAMETER: &str = "typed_default_parameter";
    pub const TYPE: &str = "type";

    // Modifier keywords
    pub const ASYNC: &str = "async";
}

/// Receiver names stripped from the front of a parameter list.
const RECEIVER_NAMES: [&str; 2] = ["self", "cls"];

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8.
fn node_text(node: &Node, content: &[u8]) -> Option<String> {
    match std::str::from_utf8(&content[node.byte_range()]) {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}

/// Extract every class and top-level function from a Python syntax tree.
///
/// Classes at any nesting depth are collected; each function lands either in
/// the method list of its nearest enclosing class or in the returned
/// top-level function list.
#[must_use]
pub fn extract_declarations(
    tree: &tree_sitter::Tree,
    content: &[u8],
) -> (Vec<ClassDoc>, Vec<FunctionDoc>) {
    let mut classes = Vec::new();
    let mut functions = Vec::new();
    let root = tree.root_node();

    extract_recursive(&root, content, &mut classes, &mut functions, None);

    (classes, functions)
}

fn extract_recursive(
    node: &Node,
    content: &[u8],
    classes: &mut Vec<ClassDoc>,
    functions: &mut Vec<FunctionDoc>,
    enclosing_class: Option<usize>,
) {
    use node_kinds::{CLASS_DEFINITION, FUNCTION_DEFINITION};

    match node.kind() {
        CLASS_DEFINITION => {
            if let Some(class) = extract_class(node, content) {
                classes.push(class);
                let index = classes.len() - 1;
                // The body is walked with this class as the context; a
                // nested class will replace it for its own body.
                if let Some(body) = node.child_by_field_name("body") {
                    let mut cursor = body.walk();
                    for child in body.children(&mut cursor) {
                        extract_recursive(&child, content, classes, functions, Some(index));
                    }
                }
            }
        }
        FUNCTION_DEFINITION => {
            if let Some(function) = extract_function(node, content) {
                match enclosing_class {
                    Some(index) => classes[index].methods.push(function),
                    None => functions.push(function),
                }
            }
            // Defs nested in the body keep the same owner: an intermediate
            // function does not change the nearest enclosing class.
            if let Some(body) = node.child_by_field_name("body") {
                let mut cursor = body.walk();
                for child in body.children(&mut cursor) {
                    extract_recursive(&child, content, classes, functions, enclosing_class);
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                extract_recursive(&child, content, classes, functions, enclosing_class);
            }
        }
    }
}

fn extract_class(node: &Node, content: &[u8]) -> Option<ClassDoc> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(&name_node, content)?;

    Some(ClassDoc {
        name,
        docstring: docstring_of(node, content),
        base: base_of(node, content),
        methods: Vec::new(),
    })
}

fn extract_function(node: &Node, content: &[u8]) -> Option<FunctionDoc> {
    use node_kinds::ASYNC;

    let name_node = node.child_by_field_name("name")?;
    let name = node_text(&name_node, content)?;

    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(&params, content))
        .unwrap_or_default();

    let return_type = node
        .child_by_field_name("return_type")
        .and_then(|annotation| simple_type_name(&annotation, content));

    Some(FunctionDoc {
        name,
        docstring: docstring_of(node, content),
        parameters,
        return_type,
        is_async: node.child(0).is_some_and(|c| c.kind() == ASYNC),
    })
}

/// Resolve the docstring of a class or function definition.
///
/// The docstring is the plain string literal standing alone as the first
/// statement of the body, cleaned of indentation. Anything else (no leading
/// string, an f-string, a bytes literal, an empty result) yields the
/// sentinel.
fn docstring_of(def_node: &Node, content: &[u8]) -> String {
    raw_docstring(def_node, content)
        .map(|raw| cleandoc(&raw))
        .filter(|doc| !doc.is_empty())
        .unwrap_or_else(|| NO_DOCSTRING.to_string())
}

fn raw_docstring(def_node: &Node, content: &[u8]) -> Option<String> {
    use node_kinds::{COMMENT, EXPRESSION_STATEMENT, STRING};

    let body = def_node.child_by_field_name("body")?;

    // Comments are extras in the grammar; the first *statement* is what
    // counts.
    let mut index = 0;
    let first_statement = loop {
        let child = body.named_child(index)?;
        if child.kind() == COMMENT {
            index += 1;
            continue;
        }
        break child;
    };

    if first_statement.kind() != EXPRESSION_STATEMENT {
        return None;
    }
    let expression = first_statement.named_child(0)?;
    if expression.kind() != STRING {
        return None;
    }
    string_literal_text(&expression, content)
}

/// Content of a plain string literal, without the quote tokens.
///
/// F-strings and bytes literals are not docstrings; any `f`/`b` prefix
/// letter disqualifies the literal.
fn string_literal_text(string_node: &Node, content: &[u8]) -> Option<String> {
    use node_kinds::{STRING_END, STRING_START};

    let opening = string_node.child(0)?;
    if opening.kind() != STRING_START {
        return None;
    }
    let prefix = node_text(&opening, content)?;
    if prefix.chars().any(|c| matches!(c, 'f' | 'F' | 'b' | 'B')) {
        return None;
    }

    let closing = string_node.child(string_node.child_count() - 1)?;
    if closing.kind() != STRING_END {
        return None;
    }

    let start = opening.end_byte();
    let end = closing.start_byte();
    if start > end || end > content.len() {
        return None;
    }
    std::str::from_utf8(&content[start..end])
        .ok()
        .map(str::to_string)
}

/// Normalize docstring indentation.
///
/// Mirrors the cleanup Python applies when reading docstrings: the first
/// line is left-stripped, the indentation common to all later non-blank
/// lines is removed, and leading/trailing blank lines are dropped.
fn cleandoc(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();

    let margin = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().count() - line.trim_start().chars().count())
        .min();

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start());
        } else if let Some(margin) = margin {
            cleaned.push(strip_margin(line, margin));
        } else {
            cleaned.push(line);
        }
    }

    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }
    while cleaned.first().is_some_and(|line| line.is_empty()) {
        cleaned.remove(0);
    }

    cleaned.join("\n")
}

/// Drop the first `margin` characters of a line.
///
/// Blank lines may be shorter than the margin; they collapse to empty.
fn strip_margin(line: &str, margin: usize) -> &str {
    match line.char_indices().nth(margin) {
        Some((byte_index, _)) => &line[byte_index..],
        None => "",
    }
}

/// Name of the first base class, when it is an attribute expression.
///
/// `class Invoice(models.Model)` yields `Model`; a bare identifier base
/// yields nothing. Bases past the first are never considered.
fn base_of(class_node: &Node, content: &[u8]) -> Option<String> {
    use node_kinds::{ATTRIBUTE, COMMENT, KEYWORD_ARGUMENT};

    let superclasses = class_node.child_by_field_name("superclasses")?;
    let mut cursor = superclasses.walk();
    let first_base = superclasses
        .named_children(&mut cursor)
        .find(|c| !matches!(c.kind(), KEYWORD_ARGUMENT | COMMENT))?;

    if first_base.kind() != ATTRIBUTE {
        return None;
    }
    let attribute = first_base.child_by_field_name("attribute")?;
    node_text(&attribute, content)
}

/// Classify an annotation, honoring only simple named types.
///
/// Returns the identifier's name for `x: int`; compound shapes (attributes,
/// subscripts like `List[int]`, unions, string annotations, `None`) are
/// treated as absent, never as errors.
fn simple_type_name(annotation: &Node, content: &[u8]) -> Option<String> {
    use node_kinds::{IDENTIFIER, TYPE};

    let inner = if annotation.kind() == TYPE {
        annotation.named_child(0)?
    } else {
        *annotation
    };

    if inner.kind() == IDENTIFIER {
        node_text(&inner, content)
    } else {
        None
    }
}

/// Extract the declared parameter list of a def.
///
/// Splat parameters (`*args`, `**kwargs`) and bare separators (`/`, `*`)
/// are skipped; a leading `self`/`cls` receiver is stripped.
fn extract_parameters(params_node: &Node, content: &[u8]) -> Vec<Parameter> {
    use node_kinds::{DEFAULT_PARAMETER, IDENTIFIER, TYPED_DEFAULT_PARAMETER, TYPED_PARAMETER};

    let mut parameters = Vec::new();
    let mut cursor = params_node.walk();

    for child in params_node.named_children(&mut cursor) {
        match child.kind() {
            IDENTIFIER => {
                if let Some(name) = node_text(&child, content) {
                    parameters.push(Parameter {
                        name,
                        type_name: None,
                    });
                }
            }
            TYPED_PARAMETER => {
                // The pattern is the first named child; typed splats keep
                // their stars out of the list.
                let Some(pattern) = child.named_child(0) else {
                    continue;
                };
                if pattern.kind() != IDENTIFIER {
                    continue;
                }
                if let Some(name) = node_text(&pattern, content) {
                    let type_name = child
                        .child_by_field_name("type")
                        .and_then(|annotation| simple_type_name(&annotation, content));
                    parameters.push(Parameter { name, type_name });
                }
            }
            DEFAULT_PARAMETER => {
                if let Some(name) = child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == IDENTIFIER)
                    .and_then(|n| node_text(&n, content))
                {
                    parameters.push(Parameter {
                        name,
                        type_name: None,
                    });
                }
            }
            TYPED_DEFAULT_PARAMETER => {
                if let Some(name) = child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == IDENTIFIER)
                    .and_then(|n| node_text(&n, content))
                {
                    let type_name = child
                        .child_by_field_name("type")
                        .and_then(|annotation| simple_type_name(&annotation, content));
                    parameters.push(Parameter { name, type_name });
                }
            }
            _ => {}
        }
    }

    if parameters
        .first()
        .is_some_and(|p| RECEIVER_NAMES.contains(&p.name.as_str()))
    {
        parameters.remove(0);
    }

    parameters
}
