//! AST to flight-program XML.
//!
//! Element ids are handed out in depth-first emission order from a counter
//! owned by the export call. Any identifier or operator without a schema
//! entry aborts the whole export.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use vz_core::{SourceSpan, VzError};
use vz_parser::{to_xml_string, XmlElementNode, XmlNode};

use crate::ast::*;
use crate::catalog::{binary_op_definition, event_definition, IdentifierDefinition};
use crate::globals::scan_globals;
use crate::resolve::validate_identifiers;
use crate::symbols::{ScopeHost, SymbolTable};

pub fn export_xml(ast: &AstNode) -> Result<XmlElementNode, VzError> {
    let mut resolved = ast.clone();
    validate_identifiers(&mut resolved, None);

    let mut exporter = XmlExporter {
        symbols: SymbolTable::empty(),
        next_id: 0,
    };
    let root = exporter.root(&resolved)?;
    debug!(ids = exporter.next_id, root = root.name.as_str(); "exported xml");
    Ok(root)
}

/// Exports `ast` as a complete document with the XML header.
pub fn export_xml_string(ast: &AstNode) -> Result<String, VzError> {
    Ok(to_xml_string(&export_xml(ast)?))
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("_").expect("placeholder pattern must compile"))
}

/// `(callFormat, format)` of a custom declaration. A template whose `_`
/// count matches the parameters replaces the auto-numbered default.
fn call_formats(identifier: &str, parameters: &[String], template: Option<&str>) -> (String, String) {
    if let Some(template) = template.filter(|template| !template.is_empty()) {
        if placeholder_pattern().find_iter(template).count() == parameters.len() {
            let mut index = 0;
            let call_format = placeholder_pattern().replace_all(template, |_: &regex::Captures<'_>| {
                let placeholder = format!("({})", index);
                index += 1;
                placeholder
            });
            let mut names = parameters.iter();
            let format = placeholder_pattern().replace_all(template, |_: &regex::Captures<'_>| {
                format!("|{}|", names.next().map(String::as_str).unwrap_or_default())
            });
            return (
                format!("{} {}", identifier, call_format),
                format!("{} {}", identifier, format),
            );
        }
    }

    let numbered: String = (0..parameters.len()).map(|index| format!(" ({})", index)).collect();
    let named: String = parameters.iter().map(|name| format!(" |{}|", name)).collect();
    (format!("{}{}", identifier, numbered), format!("{}{}", identifier, named))
}

fn export_error(code: &str, message: String, span: Option<SourceSpan>) -> VzError {
    match span {
        Some(span) => VzError::with_span(code, message, span),
        None => VzError::new(code, message),
    }
}

fn unexpected_node(node: &AstNode) -> VzError {
    export_error(
        "XML_EXPORT_NODE",
        format!("Unexpected AST node {}.", node.type_name()),
        node.loc(),
    )
}

fn constant() -> XmlElementNode {
    XmlElementNode::new("Constant")
}

struct XmlExporter {
    symbols: SymbolTable,
    next_id: usize,
}

impl ScopeHost for XmlExporter {
    fn symbols(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}

impl XmlExporter {
    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    /// Element with the definition's static attributes applied over `id`.
    fn defined_element(definition: &IdentifierDefinition, id: Option<String>) -> XmlElementNode {
        let mut element = XmlElementNode::new(&definition.xml_element);
        if let Some(id) = id {
            element.set_attr("id", id);
        }
        for (name, value) in &definition.static_attributes {
            element.set_attr(name, value);
        }
        element
    }

    fn root(&mut self, node: &AstNode) -> Result<XmlElementNode, VzError> {
        match node {
            AstNode::Program(program) => self.program(program),
            AstNode::VariableDeclaration(declaration) => Ok(variable(declaration)),
            AstNode::ExpressionDeclaration(declaration) => self.custom_expression(declaration),
            AstNode::Event(_) | AstNode::InstructionDeclaration(_) | AstNode::Detached(_) => self
                .top_level_block(node)?
                .ok_or_else(|| unexpected_node(node)),
            AstNode::Identifier(_)
            | AstNode::Literal(_)
            | AstNode::BinaryOp(_)
            | AstNode::UnaryOp(_)
            | AstNode::Conditional(_) => self.expression(node),
            _ => {
                let mut elements = self.statement(node)?;
                if elements.len() == 1 {
                    Ok(elements.remove(0))
                } else {
                    Err(export_error(
                        "XML_EXPORT_NODE",
                        format!("{} does not export to a single element.", node.type_name()),
                        node.loc(),
                    ))
                }
            }
        }
    }

    fn program(&mut self, program: &ProgramNode) -> Result<XmlElementNode, VzError> {
        self.symbols.globals = scan_globals(program);

        let mut root = XmlElementNode::new("Program").with_attr("name", &program.name);
        let mut variables = XmlElementNode::new("Variables");
        for declaration in &program.globals {
            variables.push(variable(declaration));
        }
        root.push(variables);

        let mut expressions = XmlElementNode::new("Expressions");
        for block in &program.body {
            match block {
                AstNode::ExpressionDeclaration(declaration) => {
                    expressions.push(self.custom_expression(declaration)?);
                }
                _ => {
                    if let Some(element) = self.top_level_block(block)? {
                        root.push(element);
                    }
                }
            }
        }
        root.push(expressions);
        Ok(root)
    }

    fn top_level_block(&mut self, node: &AstNode) -> Result<Option<XmlElementNode>, VzError> {
        match node {
            AstNode::Event(event) => self.event(event).map(Some),
            AstNode::InstructionDeclaration(declaration) => self.custom_instruction(declaration).map(Some),
            AstNode::Detached(detached) => {
                self.body_instructions(&detached.body, None, &[], detached.pos.as_deref())
            }
            other => Err(unexpected_node(other)),
        }
    }

    /// `Instructions` element holding `head` followed by `nodes`, or nothing
    /// when both are absent. `pos` lands on the first child element.
    fn body_instructions(
        &mut self,
        nodes: &[AstNode],
        head: Option<XmlElementNode>,
        locals: &[String],
        pos: Option<&str>,
    ) -> Result<Option<XmlElementNode>, VzError> {
        if nodes.is_empty() && head.is_none() {
            return Ok(None);
        }
        self.with_local_scope(locals, |exporter| {
            let mut instructions = XmlElementNode::new("Instructions");
            if let Some(head) = head {
                instructions.push(head);
            }
            for node in nodes {
                for element in exporter.statement(node)? {
                    instructions.push(element);
                }
            }
            if let Some(pos) = pos.filter(|pos| !pos.is_empty()) {
                let first = instructions.children.iter_mut().find_map(|child| match child {
                    XmlNode::Element(element) => Some(element),
                    XmlNode::Text(_) => None,
                });
                if let Some(first) = first {
                    first.set_attr("pos", pos);
                }
            }
            Ok(Some(instructions))
        })
    }

    fn event(&mut self, event: &EventNode) -> Result<XmlElementNode, VzError> {
        let Some(definition) = event_definition(&event.event) else {
            return Err(export_error(
                "XML_EXPORT_EVENT",
                format!("Unexpected Event '{}'.", event.event),
                event.loc,
            ));
        };

        let mut head = XmlElementNode::new("Event")
            .with_attr("event", &event.event)
            .with_attr("id", self.allocate_id())
            .with_attr("style", definition.style);
        if definition.has_filter {
            head.push(
                constant()
                    .with_attr("canReplace", "false")
                    .with_attr("text", event.event_filter.as_deref().unwrap_or_default()),
            );
        }

        let locals = definition
            .local_vars
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        let block = self.body_instructions(&event.body, Some(head), &locals, event.pos.as_deref())?;
        block.ok_or_else(|| unexpected_node(&AstNode::Event(event.clone())))
    }

    fn custom_instruction(
        &mut self,
        declaration: &InstructionDeclarationNode,
    ) -> Result<XmlElementNode, VzError> {
        let (call_format, format) = call_formats(
            &declaration.identifier,
            &declaration.parameters,
            declaration.call_format.as_deref(),
        );
        let head = XmlElementNode::new("CustomInstruction")
            .with_attr("callFormat", call_format)
            .with_attr("format", format)
            .with_attr("name", &declaration.identifier)
            .with_attr("id", self.allocate_id())
            .with_attr("style", "custom-instruction");
        let block = self.body_instructions(
            &declaration.body,
            Some(head),
            &declaration.parameters,
            declaration.pos.as_deref(),
        )?;
        block.ok_or_else(|| {
            unexpected_node(&AstNode::InstructionDeclaration(declaration.clone()))
        })
    }

    fn custom_expression(
        &mut self,
        declaration: &ExpressionDeclarationNode,
    ) -> Result<XmlElementNode, VzError> {
        let (call_format, format) = call_formats(
            &declaration.identifier,
            &declaration.parameters,
            declaration.call_format.as_deref(),
        );
        self.with_local_scope(&declaration.parameters, |exporter| {
            let mut element = XmlElementNode::new("CustomExpression")
                .with_attr("name", &declaration.identifier)
                .with_attr("callFormat", call_format)
                .with_attr("format", format!("{} return (0)", format))
                .with_attr("style", "custom-expression");
            if let Some(pos) = declaration.pos.as_deref().filter(|pos| !pos.is_empty()) {
                element.set_attr("pos", pos);
            }
            element.push(exporter.expression(&declaration.expression)?);
            Ok(element)
        })
    }

    fn statement(&mut self, node: &AstNode) -> Result<Vec<XmlElementNode>, VzError> {
        let element = match node {
            AstNode::Instruction(instruction) => {
                let Some(definition) = self
                    .symbols
                    .resolve_instruction_identifier(&instruction.identifier, instruction.kind)
                    .cloned()
                else {
                    return Err(export_error(
                        "XML_EXPORT_UNRESOLVED",
                        format!("Unresolved instruction '{}'.", instruction.identifier),
                        instruction.loc,
                    ));
                };
                let mut element = Self::defined_element(&definition, Some(self.allocate_id()));
                self.push_arguments(&mut element, &instruction.arguments, &definition)?;
                element
            }
            AstNode::Wait(wait) => {
                let (tag, style) = match wait.wait_type {
                    WaitType::Seconds => ("WaitSeconds", "wait-seconds"),
                    WaitType::Condition => ("WaitUntil", "wait-until"),
                };
                let mut element = XmlElementNode::new(tag)
                    .with_attr("id", self.allocate_id())
                    .with_attr("style", style);
                element.push(self.expression(&wait.condition)?);
                element
            }
            AstNode::If(if_node) => return self.if_chain(if_node),
            AstNode::While(while_node) => {
                self.guarded_block("While", "while", &while_node.condition, &while_node.body)?
            }
            AstNode::Repeat(repeat) => {
                self.guarded_block("Repeat", "repeat", &repeat.count, &repeat.body)?
            }
            AstNode::For(for_node) => {
                let names = [for_node.var.clone()];
                self.with_local_scope(&names, |exporter| {
                    let mut element = XmlElementNode::new("For")
                        .with_attr("var", &for_node.var)
                        .with_attr("id", exporter.allocate_id())
                        .with_attr("style", "for");
                    element.push(exporter.expression(&for_node.start)?);
                    element.push(exporter.expression(&for_node.end)?);
                    element.push(exporter.expression(&for_node.step)?);
                    if let Some(body) = exporter.body_instructions(&for_node.body, None, &[], None)? {
                        element.push(body);
                    }
                    Ok::<_, VzError>(element)
                })?
            }
            AstNode::Break(_) => XmlElementNode::new("Break").with_attr("style", "break"),
            AstNode::Assignment(assignment) => {
                let (tag, style) = match assignment.operator {
                    AssignOperator::Change => ("ChangeVariable", "change-variable"),
                    AssignOperator::Set => ("SetVariable", "set-variable"),
                };
                let mut element = XmlElementNode::new(tag)
                    .with_attr("id", self.allocate_id())
                    .with_attr("style", style);
                element.push(self.expression(&assignment.target)?);
                element.push(self.expression(&assignment.value)?);
                element
            }
            AstNode::Comment(comment) => {
                let mut element = XmlElementNode::new("Comment")
                    .with_attr("id", self.allocate_id())
                    .with_attr("style", "comment");
                element.push(
                    constant()
                        .with_attr("style", "comment-text")
                        .with_attr("canReplace", "false")
                        .with_attr("text", &comment.comment),
                );
                element
            }
            other => return Err(unexpected_node(other)),
        };
        Ok(vec![element])
    }

    fn guarded_block(
        &mut self,
        tag: &str,
        style: &str,
        guard: &AstNode,
        body: &[AstNode],
    ) -> Result<XmlElementNode, VzError> {
        let mut element = XmlElementNode::new(tag)
            .with_attr("id", self.allocate_id())
            .with_attr("style", style);
        element.push(self.expression(guard)?);
        if let Some(body) = self.body_instructions(body, None, &[], None)? {
            element.push(body);
        }
        Ok(element)
    }

    /// One `If` followed by an `ElseIf` per rung; a final `else` becomes an
    /// `ElseIf` guarded by a constant `true`.
    fn if_chain(&mut self, if_node: &IfNode) -> Result<Vec<XmlElementNode>, VzError> {
        let mut elements = vec![self.guarded_block("If", "if", &if_node.condition, &if_node.consequent)?];

        let mut alternative = if_node.alternative.as_slice();
        loop {
            match alternative {
                [] => break,
                [AstNode::If(rung)] => {
                    elements.push(self.guarded_block(
                        "ElseIf",
                        "else-if",
                        &rung.condition,
                        &rung.consequent,
                    )?);
                    alternative = rung.alternative.as_slice();
                }
                body => {
                    let mut element = XmlElementNode::new("ElseIf")
                        .with_attr("id", self.allocate_id())
                        .with_attr("style", "else");
                    element.push(constant().with_attr("bool", "true"));
                    if let Some(body) = self.body_instructions(body, None, &[], None)? {
                        element.push(body);
                    }
                    elements.push(element);
                    break;
                }
            }
        }
        Ok(elements)
    }

    fn push_arguments(
        &mut self,
        element: &mut XmlElementNode,
        arguments: &[AstNode],
        definition: &IdentifierDefinition,
    ) -> Result<(), VzError> {
        for argument in arguments.iter().chain(&definition.static_arguments_post) {
            element.push(self.expression(argument)?);
        }
        Ok(())
    }

    fn expression(&mut self, node: &AstNode) -> Result<XmlElementNode, VzError> {
        match node {
            AstNode::Identifier(identifier) => {
                let Some(definition) = self
                    .symbols
                    .resolve_expression_identifier(&identifier.identifier, identifier.kind)
                    .map(|definition| definition.into_owned())
                else {
                    return Err(export_error(
                        "XML_EXPORT_UNRESOLVED",
                        format!("Unresolved identifier '{}'.", identifier.identifier),
                        identifier.identifier_loc.or(identifier.loc),
                    ));
                };
                let mut element = Self::defined_element(&definition, None);
                self.push_arguments(&mut element, &identifier.arguments, &definition)?;
                Ok(element)
            }
            AstNode::Literal(literal) => Ok(match literal.value_type {
                LiteralType::Bool => constant()
                    .with_attr("style", &literal.value)
                    .with_attr("bool", &literal.value),
                LiteralType::Number => constant().with_attr("number", &literal.value),
                LiteralType::String => constant().with_attr("text", &literal.value),
                LiteralType::Vector => constant().with_attr("vector", &literal.value),
            }),
            AstNode::BinaryOp(op) => {
                let Some(definition) = binary_op_definition(&op.op) else {
                    return Err(export_error(
                        "XML_EXPORT_OPERATOR",
                        format!("Unexpected op '{}'.", op.op),
                        op.loc,
                    ));
                };
                let mut element = XmlElementNode::new(&definition.xml_element).with_attr("op", &op.op);
                for (name, value) in &definition.static_attributes {
                    element.set_attr(name, value);
                }
                element.push(self.expression(&op.lhs)?);
                element.push(self.expression(&op.rhs)?);
                Ok(element)
            }
            AstNode::UnaryOp(op) if op.op == "not" => {
                let mut element = XmlElementNode::new("Not").with_attr("style", "op-not");
                element.push(self.expression(&op.operand)?);
                Ok(element)
            }
            AstNode::UnaryOp(op) => Err(export_error(
                "XML_EXPORT_OPERATOR",
                format!("Unexpected op '{}'.", op.op),
                op.loc,
            )),
            AstNode::Conditional(conditional) => {
                let mut element = XmlElementNode::new("Conditional").with_attr("style", "conditional");
                element.push(self.expression(&conditional.condition)?);
                element.push(self.expression(&conditional.consequent)?);
                element.push(self.expression(&conditional.alternative)?);
                Ok(element)
            }
            other => Err(unexpected_node(other)),
        }
    }
}

fn variable(declaration: &VariableDeclarationNode) -> XmlElementNode {
    let mut element = XmlElementNode::new("Variable").with_attr("name", &declaration.identifier);
    match declaration.variable_type {
        VariableType::Value => element.set_attr("number", "0"),
        VariableType::List => element.push(XmlElementNode::new("Items")),
    }
    element
}

#[cfg(test)]
mod export_tests {
    use super::*;
    use vz_core::ProblemLog;

    fn export(source: &str) -> XmlElementNode {
        let mut log = ProblemLog::new();
        let cst = vz_parser::parse_program(source, &mut log);
        assert!(!log.has_errors(), "syntax errors: {:?}", log.problems);
        export_xml(&crate::builder::build_program(&cst)).expect("export")
    }

    fn blocks(root: &XmlElementNode) -> Vec<&XmlElementNode> {
        root.element_children()
            .filter(|child| child.name == "Instructions")
            .collect()
    }

    fn ids(element: &XmlElementNode, out: &mut Vec<usize>) {
        if let Some(id) = element.attr("id") {
            out.push(id.parse().expect("numeric id"));
        }
        for child in element.element_children() {
            ids(child, out);
        }
    }

    #[test]
    fn program_shape() {
        let root = export("#program \"Demo\"\nvar speed\nlist targets\ndef expression twice(x): x * 2\non FlightStart {\n  speed = twice(3)\n}\n");
        assert_eq!(root.name, "Program");
        assert_eq!(root.attr("name"), Some("Demo"));

        let names = root.element_children().map(|child| child.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Variables", "Instructions", "Expressions"]);

        let variables = root.child_named("Variables").expect("variables");
        let declared = variables.element_children().collect::<Vec<_>>();
        assert_eq!(declared[0].attr("number"), Some("0"));
        assert!(declared[1].child_named("Items").is_some());

        let expressions = root.child_named("Expressions").expect("expressions");
        let custom = expressions.first_element().expect("custom expression");
        assert_eq!(custom.attr("callFormat"), Some("twice (0)"));
        assert_eq!(custom.attr("format"), Some("twice |x| return (0)"));
        assert_eq!(custom.attr("id"), None);
        assert_eq!(custom.first_element().map(|op| op.name.as_str()), Some("BinaryOp"));
    }

    #[test]
    fn ids_follow_emission_order() {
        let root = export("on FlightStart {\n  wait 1\n  if true {\n    break\n  }\n}\ndef Go(a) {\n  Display a\n}\n");
        let mut seen = Vec::new();
        ids(&root, &mut seen);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn else_if_chain_becomes_siblings() {
        let root = export("var a\nvar b\n{\n  if a {\n    break\n  } else if b {\n    break\n  } else {\n    break\n  }\n}\n");
        let block = blocks(&root)[0];
        let tags = block
            .element_children()
            .map(|child| (child.name.as_str(), child.attr("style").unwrap_or_default()))
            .collect::<Vec<_>>();
        assert_eq!(tags, vec![("If", "if"), ("ElseIf", "else-if"), ("ElseIf", "else")]);
        let last = block.element_children().last().expect("else");
        assert_eq!(last.first_element().and_then(|guard| guard.attr("bool")), Some("true"));
    }

    #[test]
    fn events_carry_filter_constant_and_pos() {
        let root = export("#pos \"5,6\"\non \"stage\"(data) {\n  Log.Message data\n}\n");
        let block = blocks(&root)[0];
        let event = block.first_element().expect("event");
        assert_eq!(event.attr("event"), Some("ReceiveMessage"));
        assert_eq!(event.attr("pos"), Some("5,6"));
        let filter = event.first_element().expect("filter");
        assert_eq!(filter.attr("text"), Some("stage"));
        assert_eq!(filter.attr("canReplace"), Some("false"));

        let log = block.element_children().nth(1).expect("log message");
        let argument = log.first_element().expect("argument");
        assert_eq!(argument.name, "Variable");
        assert_eq!(argument.attr("local"), Some("true"));
        assert_eq!(argument.attr("variableName"), Some("data"));
    }

    #[test]
    fn format_template_replaces_auto_numbering() {
        let root = export("#fmt \"move _ by _\"\ndef Move(part, amount) {\n}\n");
        let head = blocks(&root)[0].first_element().expect("custom instruction");
        assert_eq!(head.attr("callFormat"), Some("Move move (0) by (1)"));
        assert_eq!(head.attr("format"), Some("Move move |part| by |amount|"));
    }

    #[test]
    fn mismatched_template_falls_back() {
        let (call_format, format) = call_formats("Go", &["a".to_string()], Some("no placeholders"));
        assert_eq!(call_format, "Go (0)");
        assert_eq!(format, "Go |a|");
    }

    #[test]
    fn variadic_join_appends_empty_text() {
        let root = export("{\n  Log.Message String.join(\"a\", \"b\")\n}\n");
        let message = blocks(&root)[0].first_element().expect("log message");
        let join = message.first_element().expect("join");
        let texts = join
            .element_children()
            .map(|child| child.attr("text").unwrap_or("?"))
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["a", "b", ""]);
    }

    #[test]
    fn comparisons_carry_op_and_style() {
        let root = export("var x\n{\n  x = 1 >= 2\n}\n");
        let set = blocks(&root)[0].first_element().expect("set variable");
        assert_eq!(set.name, "SetVariable");
        let comparison = set.element_children().nth(1).expect("comparison");
        assert_eq!(comparison.name, "Comparison");
        assert_eq!(comparison.attr("op"), Some("ge"));
        assert_eq!(comparison.attr("style"), Some("op-gte"));
    }

    #[test]
    fn unresolved_identifier_aborts() {
        let mut log = ProblemLog::new();
        let cst = vz_parser::parse_program("{\n  Launch 1\n}\n", &mut log);
        let error = export_xml(&crate::builder::build_program(&cst)).expect_err("unresolved");
        assert_eq!(error.code, "XML_EXPORT_UNRESOLVED");
        assert!(error.message.contains("Launch"));
    }

    #[test]
    fn unknown_operator_aborts() {
        let node = AstNode::binary("xor", AstNode::number("1"), AstNode::number("2"));
        assert_eq!(export_xml(&node).expect_err("operator").code, "XML_EXPORT_OPERATOR");
    }

    #[test]
    fn unknown_event_aborts() {
        let node = AstNode::Event(EventNode {
            pos: None,
            event: "Landed".to_string(),
            event_filter: None,
            parameters: Vec::new(),
            parameters_loc: None,
            body: Vec::new(),
            locals: None,
            loc: None,
        });
        assert_eq!(export_xml(&node).expect_err("event").code, "XML_EXPORT_EVENT");
    }

    #[test]
    fn error_nodes_abort() {
        let program = AstNode::Program(ProgramNode {
            name: "p".to_string(),
            globals: Vec::new(),
            body: vec![AstNode::Detached(DetachedNode {
                pos: None,
                body: vec![AstNode::error()],
                loc: None,
            })],
            loc: None,
        });
        assert_eq!(export_xml(&program).expect_err("error node").code, "XML_EXPORT_NODE");
    }

    #[test]
    fn empty_detached_blocks_are_dropped() {
        let root = export("{\n}\n");
        assert!(blocks(&root).is_empty());
    }

    #[test]
    fn document_string_has_header() {
        let mut log = ProblemLog::new();
        let cst = vz_parser::parse_program("var x\n", &mut log);
        let text = export_xml_string(&crate::builder::build_program(&cst)).expect("export");
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("<Variable name=\"x\" number=\"0\""));
    }
}
