use std::sync::OnceLock;

use regex::Regex;
use vz_core::VzError;
use vz_parser::XmlElementNode;

use super::expression::expression;
use super::statement::statements;
use crate::ast::*;
use crate::catalog::event_definition;

fn parameter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\|([^|]*)\|").expect("parameter pattern must compile"))
}

fn auto_numbered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?:\(\d+\) ?)*$").expect("call format pattern must compile"))
}

fn numbered_placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(\d+\)").expect("placeholder pattern must compile"))
}

/// Parameter names spelled `|name|` in a declaration's human format.
fn extract_parameters(format: &str) -> Vec<String> {
    parameter_pattern()
        .captures_iter(format)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Recovers the `#fmt` template of a declaration, or `None` when the stored
/// call format is the auto-numbered default.
fn filter_call_format(identifier: Option<&str>, call_format: Option<&str>) -> Option<String> {
    let (identifier, call_format) = (identifier?, call_format?);
    let trimmed = call_format.get(identifier.len()..).unwrap_or_default().trim();
    if auto_numbered_pattern().is_match(trimmed) {
        return None;
    }
    Some(numbered_placeholder_pattern().replace_all(trimmed, "_").into_owned())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_string)
}

pub(super) fn program(root: &XmlElementNode) -> Result<AstNode, VzError> {
    let globals = root
        .child_named("Variables")
        .map(variables)
        .unwrap_or_default();

    let mut body = Vec::new();
    for block in root.element_children().filter(|child| child.name == "Instructions") {
        if let Some(node) = instructions_block(block)? {
            body.push(node);
        }
    }
    if let Some(expressions) = root.child_named("Expressions") {
        for declaration in expressions
            .element_children()
            .filter(|child| child.name == "CustomExpression")
        {
            body.push(custom_expression(declaration)?);
        }
    }

    Ok(AstNode::Program(ProgramNode {
        name: root.attr("name").unwrap_or_default().to_string(),
        globals,
        body,
        loc: None,
    }))
}

fn variables(element: &XmlElementNode) -> Vec<VariableDeclarationNode> {
    element
        .element_children()
        .filter(|child| child.name == "Variable")
        .map(|variable| VariableDeclarationNode {
            identifier: variable.attr("name").unwrap_or_default().to_string(),
            identifier_loc: None,
            variable_type: if variable.attr("number").is_some() {
                VariableType::Value
            } else {
                VariableType::List
            },
            loc: None,
        })
        .collect()
}

/// One top-level `Instructions` element. The first child decides whether it
/// is an event handler, a custom instruction or a detached block.
fn instructions_block(element: &XmlElementNode) -> Result<Option<AstNode>, VzError> {
    let children = element.element_children().collect::<Vec<_>>();
    let Some((header, rest)) = children.split_first() else {
        return Ok(None);
    };
    let pos = non_empty(header.attr("pos"));

    let node = match header.name.as_str() {
        "CustomInstruction" => AstNode::InstructionDeclaration(InstructionDeclarationNode {
            pos,
            identifier: header.attr("name").unwrap_or_default().to_string(),
            identifier_loc: None,
            call_format: filter_call_format(header.attr("name"), header.attr("callFormat")),
            parameters: extract_parameters(header.attr("format").unwrap_or_default()),
            body: statements(rest)?,
            locals: None,
            loc: None,
        }),
        "Event" => {
            let event = header.attr("event").unwrap_or_default().to_string();
            let event_filter = if event == "ReceiveMessage" {
                non_empty(header.first_element().and_then(|filter| filter.attr("text")))
            } else {
                None
            };
            let parameters = event_definition(&event)
                .map(|definition| {
                    definition
                        .local_vars
                        .iter()
                        .map(|name| name.to_string())
                        .collect()
                })
                .unwrap_or_default();
            AstNode::Event(EventNode {
                pos,
                event,
                event_filter,
                parameters,
                parameters_loc: None,
                body: statements(rest)?,
                locals: None,
                loc: None,
            })
        }
        _ => AstNode::Detached(DetachedNode {
            pos,
            body: statements(&children)?,
            loc: None,
        }),
    };
    Ok(Some(node))
}

fn custom_expression(element: &XmlElementNode) -> Result<AstNode, VzError> {
    Ok(AstNode::ExpressionDeclaration(ExpressionDeclarationNode {
        pos: non_empty(element.attr("pos")),
        identifier: element.attr("name").unwrap_or_default().to_string(),
        identifier_loc: None,
        call_format: filter_call_format(element.attr("name"), element.attr("callFormat")),
        parameters: extract_parameters(element.attr("format").unwrap_or_default()),
        expression: Box::new(expression(element.first_element())?),
        locals: None,
        loc: None,
    }))
}
