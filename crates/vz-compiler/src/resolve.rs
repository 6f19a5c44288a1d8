//! Identifier resolution and validation.
//!
//! One pre-order walk assigns a kind to every `Unknown` identifier and
//! instruction, checks arity against the matching definition and writes the
//! local names of each scoped construct back onto the node. Diagnostics go to
//! the optional log and never stop the walk.

use log::debug;
use vz_core::{ProblemLog, SourceSpan};

use crate::ast::{
    AstNode, EventNode, ForNode, IdentifierKind, IdentifierNode, InstructionKind,
    InstructionNode,
};
use crate::catalog::{event_definition, Arity};
use crate::globals::scan_globals;
use crate::symbols::{ScopeHost, SymbolTable};

/// Resolves `ast` in place. Resolution is idempotent: kinds already assigned
/// are kept and only re-validated.
pub fn validate_identifiers(ast: &mut AstNode, log: Option<&mut ProblemLog>) {
    let mut resolver = Resolver {
        symbols: SymbolTable::empty(),
        log,
    };
    resolver.visit(ast);
}

struct Resolver<'a> {
    symbols: SymbolTable,
    log: Option<&'a mut ProblemLog>,
}

impl ScopeHost for Resolver<'_> {
    fn symbols(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}

impl Resolver<'_> {
    fn error(&mut self, message: String, span: Option<SourceSpan>) {
        if let Some(log) = self.log.as_deref_mut() {
            log.error(message, span.map(|s| s.start), span.map(|s| s.end));
        }
    }

    fn visit_all(&mut self, nodes: &mut [AstNode]) {
        for node in nodes {
            self.visit(node);
        }
    }

    fn visit(&mut self, node: &mut AstNode) {
        match node {
            AstNode::Program(program) => {
                self.symbols.globals = scan_globals(program);
                debug!(
                    variables = self.symbols.globals.variables.len(),
                    instructions = self.symbols.globals.instructions.len(),
                    expressions = self.symbols.globals.expressions.len();
                    "scanned program globals"
                );
                self.visit_all(&mut program.body);
            }
            AstNode::Event(event) => self.visit_event(event),
            AstNode::InstructionDeclaration(declaration) => {
                self.with_local_scope(&declaration.parameters, |resolver| {
                    resolver.visit_all(&mut declaration.body);
                    declaration.locals = Some(resolver.symbols.current_frame_names());
                });
            }
            AstNode::ExpressionDeclaration(declaration) => {
                self.with_local_scope(&declaration.parameters, |resolver| {
                    resolver.visit(&mut declaration.expression);
                    declaration.locals = Some(resolver.symbols.current_frame_names());
                });
            }
            AstNode::For(for_node) => self.visit_for(for_node),
            AstNode::Instruction(instruction) => self.visit_instruction(instruction),
            AstNode::Identifier(identifier) => self.visit_identifier(identifier),
            AstNode::Detached(detached) => self.visit_all(&mut detached.body),
            AstNode::Assignment(assignment) => {
                self.visit(&mut assignment.target);
                self.visit(&mut assignment.value);
            }
            AstNode::Wait(wait) => self.visit(&mut wait.condition),
            AstNode::If(if_node) => {
                self.visit(&mut if_node.condition);
                self.visit_all(&mut if_node.consequent);
                self.visit_all(&mut if_node.alternative);
            }
            AstNode::While(while_node) => {
                self.visit(&mut while_node.condition);
                self.visit_all(&mut while_node.body);
            }
            AstNode::Repeat(repeat) => {
                self.visit(&mut repeat.count);
                self.visit_all(&mut repeat.body);
            }
            AstNode::BinaryOp(op) => {
                self.visit(&mut op.lhs);
                self.visit(&mut op.rhs);
            }
            AstNode::UnaryOp(op) => self.visit(&mut op.operand),
            AstNode::Conditional(conditional) => {
                self.visit(&mut conditional.condition);
                self.visit(&mut conditional.consequent);
                self.visit(&mut conditional.alternative);
            }
            AstNode::Error(_)
            | AstNode::VariableDeclaration(_)
            | AstNode::Comment(_)
            | AstNode::Break(_)
            | AstNode::Literal(_) => {}
        }
    }

    fn visit_event(&mut self, event: &mut EventNode) {
        match event_definition(&event.event) {
            Some(definition) => {
                let span = event.parameters_loc.or(event.loc);
                for parameter in &event.parameters {
                    if !definition.local_vars.contains(&parameter.as_str()) {
                        let message = format!(
                            "{} is not a valid parameter for event {}. Valid options are [{}]",
                            parameter,
                            event.event,
                            definition.local_vars.join(", ")
                        );
                        self.error(message, span);
                    }
                }
            }
            None => {
                let message = format!("Unknown event '{}'", event.event);
                self.error(message, event.loc);
            }
        }

        self.with_local_scope(&event.parameters, |resolver| {
            resolver.visit_all(&mut event.body);
            event.locals = Some(resolver.symbols.current_frame_names());
        });
    }

    fn visit_for(&mut self, for_node: &mut ForNode) {
        self.visit(&mut for_node.start);
        self.visit(&mut for_node.end);
        self.visit(&mut for_node.step);
        let names = [for_node.var.clone()];
        self.with_local_scope(&names, |resolver| {
            resolver.visit_all(&mut for_node.body);
            for_node.locals = Some(resolver.symbols.current_frame_names());
        });
    }

    fn visit_instruction(&mut self, node: &mut InstructionNode) {
        if node.kind == InstructionKind::Unknown {
            node.kind = self.instruction_kind(&node.identifier);
        }
        let arity = self
            .symbols
            .resolve_instruction_identifier(&node.identifier, node.kind)
            .map(|definition| definition.arity);
        self.check_definition_use(
            &node.identifier,
            node.arguments.len(),
            arity,
            node.loc,
            node.identifier_loc,
        );
        self.visit_all(&mut node.arguments);
    }

    fn visit_identifier(&mut self, node: &mut IdentifierNode) {
        if node.kind == IdentifierKind::Unknown {
            node.kind = self.expression_kind(&node.identifier, node.arguments.len());
        }

        if node.kind == IdentifierKind::Local {
            if !node.arguments.is_empty() && self.symbols.is_local(&node.identifier) {
                let message = format!("Variable '{}' is not callable", node.identifier);
                self.error(message, node.loc);
            }
        } else {
            let arity = self
                .symbols
                .resolve_expression_identifier(&node.identifier, node.kind)
                .map(|definition| definition.arity);
            self.check_definition_use(
                &node.identifier,
                node.arguments.len(),
                arity,
                node.loc,
                node.identifier_loc,
            );
        }

        self.visit_all(&mut node.arguments);
    }

    fn expression_kind(&self, name: &str, argument_count: usize) -> IdentifierKind {
        if self.symbols.builtin.expression(name).is_some() {
            IdentifierKind::Builtin
        } else if self.symbols.is_local(name) {
            IdentifierKind::Local
        } else if argument_count == 0 && self.symbols.globals.variables.contains_key(name) {
            IdentifierKind::Global
        } else if self.symbols.globals.expressions.contains_key(name) {
            IdentifierKind::Expression
        } else {
            IdentifierKind::Invalid
        }
    }

    fn instruction_kind(&self, name: &str) -> InstructionKind {
        if self.symbols.builtin.instruction(name).is_some() {
            InstructionKind::Builtin
        } else if self.symbols.globals.instructions.contains_key(name) {
            InstructionKind::Global
        } else {
            InstructionKind::Invalid
        }
    }

    fn check_definition_use(
        &mut self,
        identifier: &str,
        argument_count: usize,
        arity: Option<Arity>,
        loc: Option<SourceSpan>,
        identifier_loc: Option<SourceSpan>,
    ) {
        match arity {
            Some(arity) if !arity.accepts(argument_count) => {
                let message = format!(
                    "'{}' has {} out of {} expected arguments",
                    identifier, argument_count, arity
                );
                self.error(message, loc);
            }
            Some(_) => {}
            None => {
                let message = format!("Unknown identifier '{}'", identifier);
                self.error(message, identifier_loc.or(loc));
            }
        }
    }
}
