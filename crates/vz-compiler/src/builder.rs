//! Concrete syntax tree to AST.
//!
//! Missing children left behind by syntax errors become `Error` placeholders,
//! so a partially invalid source still produces a complete tree.

use std::collections::HashMap;

use log::trace;
use vz_core::SourceSpan;
use vz_parser::{
    CstArguments, CstAssign, CstAssignTarget, CstBlock, CstDeclName, CstDef, CstDefExpression,
    CstDirective, CstEvent, CstEventName, CstExpression, CstExpressionKind, CstFor, CstIdentifier,
    CstIf, CstElse, CstLiteral, CstMember, CstNameKind, CstParameters, CstProgram, CstQualifier,
    CstStatement, CstTopLevel, CstVarDeclaration, CstWait, Token,
};

use crate::ast::*;
use crate::catalog::event_definition;
use crate::strings::string_token_value;

pub fn build_program(program: &CstProgram) -> AstNode {
    AstBuilder::default().program(program)
}

/// Pending `#name "value"` directives. Each is taken by at most one
/// declaration.
#[derive(Default)]
struct AstBuilder {
    directives: HashMap<String, String>,
}

impl AstBuilder {
    fn take_directive(&mut self, name: &str) -> Option<String> {
        let value = self.directives.remove(name);
        if let Some(value) = &value {
            trace!(directive = name, value = value.as_str(); "consumed directive");
        }
        value
    }

    fn program(&mut self, program: &CstProgram) -> AstNode {
        let mut name = "program".to_string();
        let mut globals = Vec::new();
        let mut body = Vec::new();

        for element in &program.elements {
            match element {
                CstTopLevel::Directive(directive) => self.directive(directive, &mut name),
                CstTopLevel::VarDeclaration(declaration) => {
                    globals.push(var_declaration(declaration));
                }
                CstTopLevel::Event(event) => body.push(self.event(event)),
                CstTopLevel::Def(def) => body.push(self.def(def)),
                CstTopLevel::DefExpression(def) => body.push(self.def_expression(def)),
                CstTopLevel::Block(block) => body.push(self.detached(block)),
            }
        }

        AstNode::Program(ProgramNode {
            name,
            globals,
            body,
            loc: None,
        })
    }

    fn directive(&mut self, directive: &CstDirective, program_name: &mut String) {
        let Some(name) = &directive.name else {
            return;
        };
        let value = directive.value.as_deref().map(string_token_value);
        if name == "program" {
            *program_name = value.unwrap_or_else(|| name.clone());
            return;
        }
        match value {
            Some(value) if !value.is_empty() => {
                self.directives.insert(name.clone(), value);
            }
            _ => {
                self.directives.remove(name);
            }
        }
    }

    fn event(&mut self, event: &CstEvent) -> AstNode {
        let pos = self.take_directive("pos");
        let parameters = parameter_names(event.parameters.as_ref());
        let body = self.block_statements(event.body.as_ref());

        let (event_name, event_filter, parameters_loc) = match &event.name {
            Some(CstEventName::Word(word)) if event_definition(word).is_some() => (
                word.clone(),
                None,
                event.parameters.as_ref().map(|parameters| parameters.span),
            ),
            Some(CstEventName::Word(word)) => ("ReceiveMessage".to_string(), Some(word.clone()), None),
            Some(CstEventName::Message(raw)) => (
                "ReceiveMessage".to_string(),
                Some(string_token_value(raw)),
                None,
            ),
            None => ("ReceiveMessage".to_string(), Some(String::new()), None),
        };

        AstNode::Event(EventNode {
            pos,
            event: event_name,
            event_filter,
            parameters,
            parameters_loc,
            body,
            locals: None,
            loc: Some(event.span),
        })
    }

    fn def(&mut self, def: &CstDef) -> AstNode {
        let pos = self.take_directive("pos");
        let call_format = self.take_directive("fmt");
        AstNode::InstructionDeclaration(InstructionDeclarationNode {
            pos,
            identifier: decl_name_value(def.name.as_ref()),
            identifier_loc: def.name.as_ref().map(|name| name.span),
            call_format,
            parameters: parameter_names(def.parameters.as_ref()),
            body: self.block_statements(def.body.as_ref()),
            locals: None,
            loc: Some(def.span),
        })
    }

    fn def_expression(&mut self, def: &CstDefExpression) -> AstNode {
        let pos = self.take_directive("pos");
        let call_format = self.take_directive("fmt");
        AstNode::ExpressionDeclaration(ExpressionDeclarationNode {
            pos,
            identifier: decl_name_value(def.name.as_ref()),
            identifier_loc: def.name.as_ref().map(|name| name.span),
            call_format,
            parameters: parameter_names(def.parameters.as_ref()),
            expression: Box::new(expression_or_error(def.value.as_ref())),
            locals: None,
            loc: Some(def.span),
        })
    }

    fn detached(&mut self, block: &CstBlock) -> AstNode {
        let pos = self.take_directive("pos");
        AstNode::Detached(DetachedNode {
            pos,
            body: self.block_statements(Some(block)),
            loc: Some(block.span),
        })
    }

    fn block_statements(&mut self, block: Option<&CstBlock>) -> Vec<AstNode> {
        let Some(block) = block else {
            return Vec::new();
        };
        block
            .statements
            .iter()
            .map(|statement| self.statement(statement))
            .collect()
    }

    fn statement(&mut self, statement: &CstStatement) -> AstNode {
        match statement {
            CstStatement::Comment { text, span } => AstNode::Comment(CommentNode {
                comment: text.get(2..).unwrap_or_default().trim_start().to_string(),
                loc: Some(*span),
            }),
            CstStatement::If(if_statement) => self.if_statement(if_statement),
            CstStatement::While(loop_statement) => AstNode::While(WhileNode {
                condition: Box::new(expression_or_error(loop_statement.head.as_ref())),
                body: self.block_statements(loop_statement.body.as_ref()),
                loc: Some(loop_statement.span),
            }),
            CstStatement::Repeat(loop_statement) => AstNode::Repeat(RepeatNode {
                count: Box::new(expression_or_error(loop_statement.head.as_ref())),
                body: self.block_statements(loop_statement.body.as_ref()),
                loc: Some(loop_statement.span),
            }),
            CstStatement::For(for_statement) => self.for_statement(for_statement),
            CstStatement::Break { span } => AstNode::Break(BreakNode { loc: Some(*span) }),
            CstStatement::Wait(wait) => wait_statement(wait),
            CstStatement::Assign(assign) => assignment(assign),
            CstStatement::Instruction(instruction) => {
                let arguments = match &instruction.arguments {
                    CstArguments::None => Vec::new(),
                    CstArguments::List(arguments) => arguments.iter().map(expression).collect(),
                    CstArguments::Single(argument) => vec![expression(argument)],
                };
                let kind = match instruction.identifier.qualifier {
                    Some(CstQualifier::This) => InstructionKind::Global,
                    _ => InstructionKind::Unknown,
                };
                AstNode::Instruction(InstructionNode {
                    identifier: identifier_value(&instruction.identifier),
                    identifier_loc: Some(instruction.identifier.span),
                    arguments,
                    kind,
                    loc: Some(instruction.span),
                })
            }
        }
    }

    fn if_statement(&mut self, if_statement: &CstIf) -> AstNode {
        let alternative = match &if_statement.alternative {
            Some(CstElse::ElseIf(nested)) => vec![self.if_statement(nested)],
            Some(CstElse::Else(block)) => self.block_statements(Some(block)),
            None => Vec::new(),
        };
        AstNode::If(IfNode {
            condition: Box::new(expression_or_error(if_statement.condition.as_ref())),
            consequent: self.block_statements(if_statement.consequent.as_ref()),
            alternative,
            loc: Some(if_statement.span),
        })
    }

    fn for_statement(&mut self, for_statement: &CstFor) -> AstNode {
        let step = match &for_statement.step {
            Some(step) => expression(step),
            None => AstNode::number("1"),
        };
        AstNode::For(ForNode {
            var: decl_name_value(for_statement.var.as_ref()),
            start: Box::new(expression_or_error(for_statement.start.as_ref())),
            end: Box::new(expression_or_error(for_statement.end.as_ref())),
            step: Box::new(step),
            body: self.block_statements(for_statement.body.as_ref()),
            locals: None,
            loc: Some(for_statement.span),
        })
    }
}

fn var_declaration(declaration: &CstVarDeclaration) -> VariableDeclarationNode {
    VariableDeclarationNode {
        identifier: decl_name_value(declaration.name.as_ref()),
        identifier_loc: declaration.name.as_ref().map(|name| name.span),
        variable_type: if declaration.is_list {
            VariableType::List
        } else {
            VariableType::Value
        },
        loc: Some(declaration.span),
    }
}

fn wait_statement(wait: &CstWait) -> AstNode {
    let condition = match &wait.condition {
        Some(condition) => expression(condition),
        None => AstNode::number("0"),
    };
    AstNode::Wait(WaitNode {
        wait_type: if wait.until {
            WaitType::Condition
        } else {
            WaitType::Seconds
        },
        condition: Box::new(condition),
        loc: Some(wait.span),
    })
}

fn assignment(assign: &CstAssign) -> AstNode {
    let target = match &assign.target {
        CstAssignTarget::Identifier(identifier) => identifier_node(identifier, Vec::new(), identifier.span),
        CstAssignTarget::Parenthesized(inner) => expression_or_error(inner.as_ref()),
    };
    let operator = match assign.operator {
        Token::PlusAssign => AssignOperator::Change,
        _ => AssignOperator::Set,
    };
    AstNode::Assignment(AssignmentNode {
        target: Box::new(target),
        operator,
        value: Box::new(expression_or_error(assign.value.as_ref())),
        loc: Some(assign.span),
    })
}

fn decl_name_value(name: Option<&CstDeclName>) -> String {
    match name.map(|name| &name.kind) {
        Some(CstNameKind::Word(word)) => word.clone(),
        Some(CstNameKind::Quoted(raw)) => string_token_value(raw),
        None => String::new(),
    }
}

fn parameter_names(parameters: Option<&CstParameters>) -> Vec<String> {
    parameters
        .map(|parameters| {
            parameters
                .names
                .iter()
                .map(|name| decl_name_value(Some(name)))
                .collect()
        })
        .unwrap_or_default()
}

fn identifier_value(identifier: &CstIdentifier) -> String {
    match &identifier.member {
        Some(CstMember::Word(word)) => word.clone(),
        Some(CstMember::Quoted(raw)) => string_token_value(raw),
        None => String::new(),
    }
}

fn identifier_kind(identifier: &CstIdentifier) -> IdentifierKind {
    match identifier.qualifier {
        Some(CstQualifier::This) => IdentifierKind::Expression,
        Some(CstQualifier::Var) => IdentifierKind::Global,
        Some(CstQualifier::Local) => IdentifierKind::Local,
        None => IdentifierKind::Unknown,
    }
}

fn identifier_node(identifier: &CstIdentifier, arguments: Vec<AstNode>, span: SourceSpan) -> AstNode {
    AstNode::Identifier(IdentifierNode {
        identifier: identifier_value(identifier),
        kind: identifier_kind(identifier),
        identifier_loc: Some(identifier.span),
        arguments,
        loc: Some(span),
    })
}

/// Canonical AST symbol of a binary operator token.
fn operator_symbol(token: Token) -> Option<&'static str> {
    let symbol = match token {
        Token::Plus => "+",
        Token::Minus => "-",
        Token::Star => "*",
        Token::Slash => "/",
        Token::Percent => "%",
        Token::Caret => "^",
        Token::EqEq => "=",
        Token::Gt => "g",
        Token::GtEq => "ge",
        Token::Lt => "l",
        Token::LtEq => "le",
        Token::And => "and",
        Token::Or => "or",
        _ => return None,
    };
    Some(symbol)
}

fn expression_or_error(expression_node: Option<&CstExpression>) -> AstNode {
    expression_node.map(expression).unwrap_or_else(AstNode::error)
}

fn boxed_or_error(expression_node: Option<&CstExpression>) -> Box<AstNode> {
    Box::new(expression_or_error(expression_node))
}

fn expression(expression_node: &CstExpression) -> AstNode {
    let loc = Some(expression_node.span);
    match &expression_node.kind {
        CstExpressionKind::Literal(literal) => {
            let (value_type, value) = match literal {
                CstLiteral::Number { negative, digits } => (
                    LiteralType::Number,
                    if *negative {
                        format!("-{digits}")
                    } else {
                        digits.clone()
                    },
                ),
                CstLiteral::String(raw) => (LiteralType::String, string_token_value(raw)),
                CstLiteral::Bool(value) => (LiteralType::Bool, value.to_string()),
            };
            AstNode::Literal(LiteralNode {
                value_type,
                value,
                loc,
            })
        }
        CstExpressionKind::Identifier {
            identifier,
            arguments,
        } => {
            let arguments = arguments
                .as_ref()
                .map(|arguments| arguments.iter().map(expression).collect())
                .unwrap_or_default();
            identifier_node(identifier, arguments, expression_node.span)
        }
        CstExpressionKind::Parenthesized(inner) => {
            inner.as_deref().map(expression).unwrap_or_else(AstNode::error)
        }
        CstExpressionKind::Binary { operator, lhs, rhs } => match operator_symbol(*operator) {
            Some(op) => AstNode::BinaryOp(BinaryOpNode {
                op: op.to_string(),
                lhs: boxed_or_error(lhs.as_deref()),
                rhs: boxed_or_error(rhs.as_deref()),
                loc,
            }),
            None => AstNode::error(),
        },
        CstExpressionKind::Not(operand) => AstNode::UnaryOp(UnaryOpNode {
            op: "not".to_string(),
            operand: boxed_or_error(operand.as_deref()),
            loc,
        }),
        CstExpressionKind::Conditional {
            condition,
            consequent,
            alternative,
        } => AstNode::Conditional(ConditionalNode {
            condition: boxed_or_error(condition.as_deref()),
            consequent: boxed_or_error(consequent.as_deref()),
            alternative: boxed_or_error(alternative.as_deref()),
            loc,
        }),
    }
}
