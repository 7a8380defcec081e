//! AsciiDoc serialization of the project model.
//!
//! Emits the fixed preamble, then one `==` section per file in path order.
//! Within a file: classes (with their methods) sorted by name, then
//! top-level functions sorted by name. Method and function bodies share one
//! block shape; blocks are assembled as line vectors joined with newlines so
//! the spacing is reproduced exactly.

use crate::project::ProjectModel;
use crate::types::{ClassRecord, FunctionDoc, Parameter, RenderConfig, NO_DOCSTRING};

/// Lifecycle names whose sections are dropped when they carry no real
/// documentation.
const UNDOCUMENTED_LIFECYCLE: [&str; 2] = ["__init__", "__main__"];

/// Render the aggregated model into the final AsciiDoc document.
#[must_use]
pub fn render(model: &ProjectModel, config: &RenderConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        ":toc:\n:sectnums:\n:toclevels: {}\n:toc-title: Code overview\n\n",
        config.toclevels
    ));

    for (path, record) in &model.files {
        out.push_str(&format!("== /{}\n\n", path.display()));

        for (class_name, class) in &record.classes {
            out.push_str(&class_section(class_name, class));
            for (method_name, method) in &class.methods {
                let heading = format!("==== {}\n", escape_name(method_name));
                if let Some(block) = callable_block(&heading, method) {
                    out.push_str(&block);
                }
            }
        }

        for (function_name, function) in &record.functions {
            // A class of the same name governs the section; the shadowed
            // function is not emitted.
            if record.classes.contains_key(function_name) {
                continue;
            }
            let heading = format!("=== Fonction : {function_name}\n");
            if let Some(block) = callable_block(&heading, function) {
                out.push_str(&block);
            }
        }
    }

    out
}

/// Render the `=== Classe :` heading and class docstring.
fn class_section(name: &str, class: &ClassRecord) -> String {
    let mut complete_name = escape_name(name);
    if let Some(base) = &class.base {
        complete_name.push_str(&format!("(_{base}_)"));
    }
    format!("=== Classe : {complete_name}\n\n{}\n\n", class.docstring)
}

/// Render the shared method/function body, or nothing for an undocumented
/// lifecycle name.
fn callable_block(heading: &str, doc: &FunctionDoc) -> Option<String> {
    if UNDOCUMENTED_LIFECYCLE.contains(&doc.name.as_str()) && doc.docstring == NO_DOCSTRING {
        return None;
    }

    let mut lines: Vec<String> = vec![heading.to_string(), doc.docstring.clone()];
    if !doc.parameters.is_empty() {
        lines.push("\n*@params* :\n".to_string());
        lines.extend(doc.parameters.iter().map(render_parameter));
    }
    if let Some(return_type) = &doc.return_type {
        lines.push(format!("\n*@returns* : {return_type}\n"));
    }

    Some(lines.join("\n") + "\n\n")
}

fn render_parameter(parameter: &Parameter) -> String {
    match &parameter.type_name {
        Some(type_name) => format!("* {} ({type_name})", parameter.name),
        None => format!("* {}", parameter.name),
    }
}

/// Keep dunder-style names out of italics.
///
/// AsciiDoc reads `__str__` as italics markers; a leading backslash makes
/// the underscores literal. Applied to any name that both starts and ends
/// with an underscore.
fn escape_name(name: &str) -> String {
    if name.starts_with('_') && name.ends_with('_') {
        format!("\\{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassDoc, FileAnalysis, FunctionDoc};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn function(name: &str, docstring: &str) -> FunctionDoc {
        FunctionDoc {
            name: name.to_string(),
            docstring: docstring.to_string(),
            parameters: vec![],
            return_type: None,
            is_async: false,
        }
    }

    fn model_with(path: &str, classes: Vec<ClassDoc>, functions: Vec<FunctionDoc>) -> ProjectModel {
        let mut model = ProjectModel::default();
        model.add_file(FileAnalysis {
            relative_path: PathBuf::from(path),
            classes,
            functions,
        });
        model
    }

    #[rstest]
    #[case("__str__", "\\__str__")]
    #[case("_", "\\_")]
    #[case("_private", "_private")]
    #[case("trailing_", "trailing_")]
    #[case("plain", "plain")]
    fn escape_rule(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(escape_name(name), expected);
    }

    proptest! {
        #[test]
        fn escape_only_prefixes_dunder_shaped_names(name in "[A-Za-z_]{1,12}") {
            let escaped = escape_name(&name);
            let dunder_shaped = name.starts_with('_') && name.ends_with('_');
            prop_assert_eq!(escaped.starts_with('\\'), dunder_shaped);
            prop_assert!(escaped.ends_with(name.as_str()));
        }
    }

    #[test]
    fn empty_model_renders_preamble_only() {
        let model = ProjectModel::default();
        let doc = render(&model, &RenderConfig::default());

        assert_eq!(
            doc,
            ":toc:\n:sectnums:\n:toclevels: 3\n:toc-title: Code overview\n\n"
        );
    }

    #[test]
    fn toclevels_is_configurable() {
        let model = ProjectModel::default();
        let doc = render(&model, &RenderConfig { toclevels: 5 });

        assert!(doc.contains(":toclevels: 5\n"));
    }

    #[test]
    fn renders_class_with_base_methods_and_function() {
        let invoice = ClassDoc {
            name: "Invoice".to_string(),
            docstring: "An invoice.".to_string(),
            base: Some("Model".to_string()),
            methods: vec![
                FunctionDoc {
                    name: "__str__".to_string(),
                    docstring: "Render.".to_string(),
                    parameters: vec![],
                    return_type: Some("str".to_string()),
                    is_async: false,
                },
                FunctionDoc {
                    name: "compute".to_string(),
                    docstring: "Compute totals.".to_string(),
                    parameters: vec![Parameter {
                        name: "amount".to_string(),
                        type_name: Some("int".to_string()),
                    }],
                    return_type: None,
                    is_async: false,
                },
            ],
        };
        let model = model_with(
            "pkg/models.py",
            vec![invoice],
            vec![function("helper", "Help out.")],
        );

        let doc = render(&model, &RenderConfig::default());

        assert_eq!(
            doc,
            ":toc:\n:sectnums:\n:toclevels: 3\n:toc-title: Code overview\n\n\
             == /pkg/models.py\n\n\
             === Classe : Invoice(_Model_)\n\n\
             An invoice.\n\n\
             ==== \\__str__\n\nRender.\n\n*@returns* : str\n\n\n\
             ==== compute\n\nCompute totals.\n\n*@params* :\n\n* amount (int)\n\n\
             === Fonction : helper\n\nHelp out.\n\n"
        );
    }

    #[test]
    fn class_without_base_has_no_suffix() {
        let model = model_with(
            "a.py",
            vec![ClassDoc {
                name: "Plain".to_string(),
                docstring: NO_DOCSTRING.to_string(),
                base: None,
                methods: vec![],
            }],
            vec![],
        );

        let doc = render(&model, &RenderConfig::default());
        assert!(doc.contains("=== Classe : Plain\n\n"));
        assert!(!doc.contains("Plain(_"));
    }

    #[test]
    fn undocumented_init_is_skipped() {
        let model = model_with(
            "a.py",
            vec![ClassDoc {
                name: "Widget".to_string(),
                docstring: "A widget.".to_string(),
                base: None,
                methods: vec![function("__init__", NO_DOCSTRING)],
            }],
            vec![],
        );

        let doc = render(&model, &RenderConfig::default());
        assert!(!doc.contains("__init__"));
    }

    #[test]
    fn documented_init_is_rendered() {
        let model = model_with(
            "a.py",
            vec![ClassDoc {
                name: "Widget".to_string(),
                docstring: "A widget.".to_string(),
                base: None,
                methods: vec![function("__init__", "Build a widget.")],
            }],
            vec![],
        );

        let doc = render(&model, &RenderConfig::default());
        assert!(doc.contains("==== \\__init__\n\nBuild a widget.\n\n"));
    }

    #[test]
    fn function_shadowed_by_class_is_suppressed() {
        let model = model_with(
            "a.py",
            vec![ClassDoc {
                name: "thing".to_string(),
                docstring: "The class.".to_string(),
                base: None,
                methods: vec![],
            }],
            vec![function("thing", "The function.")],
        );

        let doc = render(&model, &RenderConfig::default());
        assert!(doc.contains("=== Classe : thing"));
        assert!(!doc.contains("Fonction : thing"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let model = model_with(
            "b.py",
            vec![],
            vec![function("zeta", "z"), function("alpha", "a")],
        );

        let first = render(&model, &RenderConfig::default());
        let second = render(&model, &RenderConfig::default());
        assert_eq!(first, second);

        let alpha = first.find("Fonction : alpha").unwrap();
        let zeta = first.find("Fonction : zeta").unwrap();
        assert!(alpha < zeta);
    }
}
