use log::debug;
use vz_core::{ProblemLog, VzError};
use vz_parser::{parse_program, parse_xml_document};

use crate::ast::AstNode;
use crate::builder::build_program;
use crate::export::export_xml_string;
use crate::import::import_xml;
use crate::printer::print_code;
use crate::resolve::validate_identifiers;

/// Parses vztxt source into a resolved `Program` tree. Syntax and semantic
/// diagnostics go to `log` when one is supplied and are dropped otherwise.
pub fn parse_and_validate(source: &str, log: Option<&mut ProblemLog>) -> AstNode {
    let mut scratch = ProblemLog::new();
    let log = log.unwrap_or(&mut scratch);

    let cst = parse_program(source, log);
    debug!(elements = cst.elements.len(), problems = log.len(); "parsed vztxt source");

    let mut ast = build_program(&cst);
    validate_identifiers(&mut ast, Some(&mut *log));
    debug!(problems = log.len(); "validated identifiers");
    ast
}

pub fn text_to_xml(source: &str, log: &mut ProblemLog) -> Result<String, VzError> {
    let ast = parse_and_validate(source, Some(log));
    let xml = export_xml_string(&ast)?;
    debug!(bytes = xml.len(); "exported flight program xml");
    Ok(xml)
}

pub fn xml_to_text(xml: &str) -> Result<String, VzError> {
    let document = parse_xml_document(xml)?;
    let root = &document.root;
    let Some(ast) = import_xml(root)? else {
        return Err(VzError::with_span(
            "XML_ROOT_INVALID",
            format!("Expected <Program> root, got <{}>.", root.name),
            root.location,
        ));
    };
    debug!(root = root.name.as_str(); "imported flight program xml");
    Ok(print_code(&ast))
}

/// Reprints source in canonical layout.
pub fn format_source(source: &str, log: &mut ProblemLog) -> String {
    print_code(&parse_and_validate(source, Some(log)))
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn text_to_xml_produces_a_program_document() {
        let mut log = ProblemLog::new();
        let xml = text_to_xml("var x\non FlightStart {\n  x = 1\n}\n", &mut log).expect("export");
        assert!(!log.has_errors(), "{:?}", log.problems);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<Program name=\"program\""));
        assert!(xml.contains("event=\"FlightStart\""));
    }

    #[test]
    fn unresolved_names_fail_export_and_are_reported() {
        let mut log = ProblemLog::new();
        let error = text_to_xml("on FlightStart {\n  Explode 1\n}\n", &mut log).expect_err("unresolved");
        assert_eq!(error.code, "XML_EXPORT_UNRESOLVED");
        assert!(log.has_errors());
    }

    #[test]
    fn parse_without_a_log_still_builds_a_tree() {
        let ast = parse_and_validate("on {", None);
        assert_eq!(ast.type_name(), "Program");
    }

    #[test]
    fn xml_to_text_rejects_other_roots() {
        let error = xml_to_text("<Craft />").expect_err("wrong root");
        assert_eq!(error.code, "XML_ROOT_INVALID");
        assert!(error.span.is_some());
    }

    #[test]
    fn format_source_normalizes_layout() {
        let mut log = ProblemLog::new();
        let formatted = format_source("var   x\non   FlightStart {\n x=1+2\n\n}\n", &mut log);
        assert!(!log.has_errors(), "{:?}", log.problems);
        assert_eq!(
            formatted,
            "#program \"program\"\n\nvar x\n\non FlightStart {\n  x = 1 + 2\n}\n"
        );
    }
}
