//! AST to vztxt source text.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::*;
use crate::catalog::{
    display_symbol, is_keyword, is_right_associative, precedence, DEFAULT_PRECEDENCE,
    UNKNOWN_OPERATOR_PRECEDENCE,
};
use crate::globals::scan_globals;
use crate::resolve::validate_identifiers;
use crate::strings::print_string;
use crate::symbols::{ScopeHost, SymbolTable};

const NOT_PRECEDENCE: u8 = 8;
const CONDITIONAL_PRECEDENCE: u8 = 11;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("identifier pattern must compile")
    })
}

/// True when `identifier` reads back as the same name without quoting.
fn is_bare_identifier(identifier: &str) -> bool {
    identifier_pattern().is_match(identifier)
        && identifier
            .split('.')
            .next()
            .is_some_and(|first| !is_keyword(first))
}

fn sanitize_identifier(identifier: &str) -> String {
    if is_bare_identifier(identifier) {
        identifier.to_string()
    } else {
        print_string(identifier)
    }
}

/// Member after a `this.`/`var.`/`local.` qualifier, where keywords are
/// allowed.
fn sanitize_member(identifier: &str) -> String {
    if identifier_pattern().is_match(identifier) {
        identifier.to_string()
    } else {
        print_string(identifier)
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn parameter_list(parameters: &[String]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let names = parameters
        .iter()
        .map(|name| sanitize_identifier(name))
        .collect::<Vec<_>>();
    format!("({})", names.join(", "))
}

fn directive_line(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("#{} {}\n", name, print_string(value)),
        _ => String::new(),
    }
}

fn variable_declaration(declaration: &VariableDeclarationNode) -> String {
    let keyword = match declaration.variable_type {
        VariableType::Value => "var",
        VariableType::List => "list",
    };
    format!("{} {}", keyword, sanitize_identifier(&declaration.identifier))
}

/// Renders `ast` as source text. The tree is resolved on a private copy
/// first, so identifiers carry the kinds the printed text must preserve.
pub fn print_code(ast: &AstNode) -> String {
    let mut resolved = ast.clone();
    validate_identifiers(&mut resolved, None);

    let mut printer = CodePrinter {
        symbols: SymbolTable::empty(),
    };
    if let AstNode::Program(program) = &resolved {
        printer.symbols.globals = scan_globals(program);
    }
    printer.visit(&resolved, 0, DEFAULT_PRECEDENCE)
}

struct CodePrinter {
    symbols: SymbolTable,
}

impl ScopeHost for CodePrinter {
    fn symbols(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}

impl CodePrinter {
    fn statements(&mut self, nodes: &[AstNode], depth: usize) -> String {
        nodes
            .iter()
            .map(|node| format!("\n{}{}", indent(depth), self.visit(node, depth, DEFAULT_PRECEDENCE)))
            .collect()
    }

    fn block(&mut self, nodes: &[AstNode], depth: usize) -> String {
        format!("{{{}\n{}}}", self.statements(nodes, depth + 1), indent(depth))
    }

    fn expression(&mut self, node: &AstNode) -> String {
        self.visit(node, 0, DEFAULT_PRECEDENCE)
    }

    fn argument_list(&mut self, arguments: &[AstNode]) -> String {
        if arguments.is_empty() {
            return String::new();
        }
        let printed = arguments
            .iter()
            .map(|argument| self.expression(argument))
            .collect::<Vec<_>>();
        format!("({})", printed.join(", "))
    }

    /// `ceiling` is the loosest binding the surrounding context accepts
    /// without parentheses.
    fn visit(&mut self, node: &AstNode, depth: usize, ceiling: u8) -> String {
        match node {
            AstNode::Program(program) => {
                let globals: String = program
                    .globals
                    .iter()
                    .map(|global| format!("\n{}", variable_declaration(global)))
                    .collect();
                format!(
                    "#program {}\n{}\n{}",
                    print_string(&program.name),
                    globals,
                    self.statements(&program.body, 0)
                )
            }
            AstNode::VariableDeclaration(declaration) => variable_declaration(declaration),
            AstNode::Event(event) => self.event(event, depth),
            AstNode::InstructionDeclaration(declaration) => {
                let locals = declaration
                    .locals
                    .clone()
                    .unwrap_or_else(|| declaration.parameters.clone());
                self.with_local_scope(&locals, |printer| {
                    format!(
                        "{}{}def {}{} {}\n",
                        directive_line("pos", declaration.pos.as_deref()),
                        directive_line("fmt", declaration.call_format.as_deref()),
                        sanitize_identifier(&declaration.identifier),
                        parameter_list(&declaration.parameters),
                        printer.block(&declaration.body, depth)
                    )
                })
            }
            AstNode::ExpressionDeclaration(declaration) => {
                let locals = declaration
                    .locals
                    .clone()
                    .unwrap_or_else(|| declaration.parameters.clone());
                self.with_local_scope(&locals, |printer| {
                    format!(
                        "{}{}def expression {}{}: {}\n",
                        directive_line("pos", declaration.pos.as_deref()),
                        directive_line("fmt", declaration.call_format.as_deref()),
                        sanitize_identifier(&declaration.identifier),
                        parameter_list(&declaration.parameters),
                        printer.expression(&declaration.expression)
                    )
                })
            }
            AstNode::Detached(detached) => format!(
                "{}{}\n",
                directive_line("pos", detached.pos.as_deref()),
                self.block(&detached.body, depth)
            ),
            AstNode::Instruction(instruction) => self.instruction(instruction),
            AstNode::If(if_node) => {
                let mut printed = format!(
                    "if {} {}",
                    self.expression(&if_node.condition),
                    self.block(&if_node.consequent, depth)
                );
                match if_node.alternative.as_slice() {
                    [] => {}
                    [rung @ AstNode::If(_)] => {
                        printed.push_str(" else ");
                        printed.push_str(&self.visit(rung, depth, DEFAULT_PRECEDENCE));
                    }
                    alternative => {
                        printed.push_str(" else ");
                        printed.push_str(&self.block(alternative, depth));
                    }
                }
                printed
            }
            AstNode::While(while_node) => format!(
                "while {} {}",
                self.expression(&while_node.condition),
                self.block(&while_node.body, depth)
            ),
            AstNode::For(for_node) => self.for_loop(for_node, depth),
            AstNode::Break(_) => "break".to_string(),
            AstNode::Repeat(repeat) => format!(
                "repeat {} {}",
                self.expression(&repeat.count),
                self.block(&repeat.body, depth)
            ),
            AstNode::Identifier(identifier) => self.identifier(identifier),
            AstNode::Literal(literal) => match literal.value_type {
                LiteralType::String | LiteralType::Vector => print_string(&literal.value),
                LiteralType::Number | LiteralType::Bool => literal.value.clone(),
            },
            AstNode::BinaryOp(op) => {
                let op_precedence = precedence(&op.op).unwrap_or(UNKNOWN_OPERATOR_PRECEDENCE);
                let (lhs_ceiling, rhs_ceiling) = if is_right_associative(&op.op) {
                    (op_precedence - 1, op_precedence)
                } else {
                    (op_precedence, op_precedence - 1)
                };
                let inner = format!(
                    "{} {} {}",
                    self.visit(&op.lhs, 0, lhs_ceiling),
                    display_symbol(&op.op),
                    self.visit(&op.rhs, 0, rhs_ceiling)
                );
                parenthesize(inner, ceiling < op_precedence)
            }
            AstNode::UnaryOp(op) => {
                let inner = format!("{} {}", op.op, self.visit(&op.operand, 0, NOT_PRECEDENCE));
                parenthesize(inner, ceiling < NOT_PRECEDENCE)
            }
            AstNode::Conditional(conditional) => {
                let inner = format!(
                    "if {} then {} else {}",
                    self.visit(&conditional.condition, 0, CONDITIONAL_PRECEDENCE),
                    self.visit(&conditional.consequent, 0, CONDITIONAL_PRECEDENCE - 1),
                    self.visit(&conditional.alternative, 0, CONDITIONAL_PRECEDENCE)
                );
                parenthesize(inner, ceiling < CONDITIONAL_PRECEDENCE)
            }
            AstNode::Comment(comment) => format!("// {}", comment.comment.replace('\n', "\\n")),
            AstNode::Assignment(assignment) => {
                let target = self.expression(&assignment.target);
                let value = self.expression(&assignment.value);
                match assignment.target.as_ref() {
                    AstNode::Identifier(_) => {
                        format!("{} {} {}", target, assignment.operator.as_str(), value)
                    }
                    _ => format!("({}) {} {}", target, assignment.operator.as_str(), value),
                }
            }
            AstNode::Wait(wait) => match wait.wait_type {
                WaitType::Seconds if is_literal(&wait.condition, "0") => "wait".to_string(),
                WaitType::Seconds => format!("wait {}", self.expression(&wait.condition)),
                WaitType::Condition => format!("wait until {}", self.expression(&wait.condition)),
            },
            AstNode::Error(_) => format!("<? {}>", node.type_name()),
        }
    }

    fn event(&mut self, event: &EventNode, depth: usize) -> String {
        let locals = event
            .locals
            .clone()
            .unwrap_or_else(|| event.parameters.clone());
        self.with_local_scope(&locals, |printer| {
            let head = match event.event_filter.as_deref() {
                Some(filter) if !filter.is_empty() => print_string(filter),
                _ => event.event.clone(),
            };
            format!(
                "{}on {}{} {}\n",
                directive_line("pos", event.pos.as_deref()),
                head,
                parameter_list(&event.parameters),
                printer.block(&event.body, depth)
            )
        })
    }

    fn for_loop(&mut self, for_node: &ForNode, depth: usize) -> String {
        let mut printed = format!(
            "for {} = {} to {}",
            sanitize_identifier(&for_node.var),
            self.expression(&for_node.start),
            self.expression(&for_node.end)
        );
        if !is_literal(&for_node.step, "1") {
            printed.push_str(" step ");
            printed.push_str(&self.expression(&for_node.step));
        }
        let locals = for_node
            .locals
            .clone()
            .unwrap_or_else(|| vec![for_node.var.clone()]);
        let body = self.with_local_scope(&locals, |printer| printer.block(&for_node.body, depth));
        printed.push(' ');
        printed.push_str(&body);
        printed
    }

    fn instruction(&mut self, instruction: &InstructionNode) -> String {
        let call = match instruction.arguments.as_slice() {
            [] => String::new(),
            [argument] => format!(" {}", self.expression(argument)),
            arguments => self.argument_list(arguments),
        };
        let needs_specifier = self.symbols.builtin.instruction(&instruction.identifier).is_some()
            || !is_bare_identifier(&instruction.identifier);
        if needs_specifier && instruction.kind == InstructionKind::Global {
            format!("this.{}{}", sanitize_identifier(&instruction.identifier), call)
        } else {
            format!("{}{}", instruction.identifier, call)
        }
    }

    fn identifier(&mut self, identifier: &IdentifierNode) -> String {
        let call = self.argument_list(&identifier.arguments);
        if !self.identifier_needs_specifier(identifier) {
            return format!("{}{}", identifier.identifier, call);
        }
        let qualifier = match identifier.kind {
            IdentifierKind::Expression => "this.",
            IdentifierKind::Global => "var.",
            IdentifierKind::Local => "local.",
            _ => return format!("{}{}", identifier.identifier, call),
        };
        format!("{}{}{}", qualifier, sanitize_member(&identifier.identifier), call)
    }

    /// True when the bare name would resolve to something other than the
    /// identifier's kind.
    fn identifier_needs_specifier(&self, identifier: &IdentifierNode) -> bool {
        let name = identifier.identifier.as_str();
        let visible_local = self.symbols.is_local(name);
        self.symbols.builtin.expression(name).is_some()
            || (identifier.kind != IdentifierKind::Local && visible_local)
            || (identifier.kind == IdentifierKind::Local && !visible_local)
            || !is_bare_identifier(name)
            || (identifier.kind == IdentifierKind::Expression
                && identifier.arguments.is_empty()
                && self.symbols.globals.variables.contains_key(name))
    }
}

fn parenthesize(inner: String, needed: bool) -> String {
    if needed {
        format!("({})", inner)
    } else {
        inner
    }
}

fn is_literal(node: &AstNode, value: &str) -> bool {
    matches!(node, AstNode::Literal(literal) if literal.value == value)
}

#[cfg(test)]
mod printer_tests {
    use super::*;
    use vz_core::ProblemLog;

    fn format(source: &str) -> String {
        let mut log = ProblemLog::new();
        let cst = vz_parser::parse_program(source, &mut log);
        assert!(!log.has_errors(), "syntax errors in {:?}: {:?}", source, log.problems);
        print_code(&crate::builder::build_program(&cst))
    }

    fn number(value: &str) -> AstNode {
        AstNode::number(value)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let flat = AstNode::binary("+", number("1"), AstNode::binary("*", number("2"), number("3")));
        assert_eq!(print_code(&flat), "1 + 2 * 3");

        let grouped = AstNode::binary("*", AstNode::binary("+", number("1"), number("2")), number("3"));
        assert_eq!(print_code(&grouped), "(1 + 2) * 3");
    }

    #[test]
    fn associativity_controls_parentheses() {
        let left = AstNode::binary("-", AstNode::binary("-", number("1"), number("2")), number("3"));
        assert_eq!(print_code(&left), "1 - 2 - 3");
        let right = AstNode::binary("-", number("1"), AstNode::binary("-", number("2"), number("3")));
        assert_eq!(print_code(&right), "1 - (2 - 3)");

        let power = AstNode::binary("^", number("2"), AstNode::binary("^", number("3"), number("4")));
        assert_eq!(print_code(&power), "2 ^ 3 ^ 4");
        let grouped = AstNode::binary("^", AstNode::binary("^", number("2"), number("3")), number("4"));
        assert_eq!(print_code(&grouped), "(2 ^ 3) ^ 4");
    }

    #[test]
    fn comparisons_use_text_symbols() {
        let node = AstNode::binary("and", AstNode::binary("ge", number("1"), number("2")), AstNode::binary("=", number("3"), number("4")));
        assert_eq!(print_code(&node), "1 >= 2 and 3 == 4");
    }

    #[test]
    fn not_and_conditional_parenthesize_inside_tighter_operators() {
        let negated = AstNode::UnaryOp(UnaryOpNode {
            op: "not".to_string(),
            operand: Box::new(AstNode::binary("or", number("1"), number("2"))),
            loc: None,
        });
        assert_eq!(print_code(&negated), "not (1 or 2)");

        let conditional = AstNode::Conditional(ConditionalNode {
            condition: Box::new(AstNode::Literal(LiteralNode {
                value_type: LiteralType::Bool,
                value: "true".to_string(),
                loc: None,
            })),
            consequent: Box::new(number("1")),
            alternative: Box::new(number("2")),
            loc: None,
        });
        let sum = AstNode::binary("+", conditional.clone(), number("3"));
        assert_eq!(print_code(&sum), "(if true then 1 else 2) + 3");
        assert_eq!(print_code(&conditional), "if true then 1 else 2");
    }

    #[test]
    fn program_layout() {
        let source = "#program \"Demo\"\nvar speed\nlist targets\non FlightStart {\n  speed = 1 + 2 * 3\n  for i = 1 to 10 {\n    Display i\n  }\n}\n";
        assert_eq!(
            format(source),
            "#program \"Demo\"\n\nvar speed\nlist targets\n\non FlightStart {\n  speed = 1 + 2 * 3\n  for i = 1 to 10 {\n    Display i\n  }\n}\n"
        );
    }

    #[test]
    fn directives_print_before_declarations() {
        let printed = format("#pos \"10,20\"\n#fmt \"launch at _\"\ndef Launch(x) {\n  break\n}\n");
        assert!(printed.contains("#pos \"10,20\"\n#fmt \"launch at _\"\ndef Launch(x) {\n  break\n}\n"));
    }

    #[test]
    fn qualifiers_are_printed_when_the_bare_name_is_ambiguous() {
        let printed = format("var x\nvar y\ndef expression y: 1\ndef Go(x) {\n  Display var.x + x\n  Display this.y + y\n}\n");
        assert!(printed.contains("Display var.x + x"), "{}", printed);
        assert!(printed.contains("Display this.y + y"), "{}", printed);
    }

    #[test]
    fn local_outside_its_scope_keeps_marker() {
        let node = AstNode::identifier("ghost", IdentifierKind::Local, Vec::new());
        assert_eq!(print_code(&node), "local.ghost");
    }

    #[test]
    fn custom_instruction_shadowing_builtin_uses_this() {
        let printed = format("def Display(a) {\n}\n{\n  this.Display 1\n  Display 2\n}\n");
        assert!(printed.contains("this.Display 1"), "{}", printed);
        assert!(printed.contains("\n  Display 2"), "{}", printed);
    }

    #[test]
    fn names_that_are_not_identifiers_are_quoted() {
        let printed = format("var \"fuel level\"\nvar \"if\"\n{\n  var.\"fuel level\" = 1\n}\n");
        assert!(printed.contains("var \"fuel level\"\nvar \"if\""), "{}", printed);
        assert!(printed.contains("var.\"fuel level\" = 1"), "{}", printed);
    }

    #[test]
    fn defaults_are_omitted() {
        let printed = format("{\n  for i = 1 to 3 step 1 {\n    wait 0\n  }\n  for j = 1 to 3 step 2 {\n    wait until j > 1\n  }\n}\n");
        assert!(printed.contains("for i = 1 to 3 {\n    wait\n  }"), "{}", printed);
        assert!(printed.contains("for j = 1 to 3 step 2 {\n    wait until j > 1\n  }"), "{}", printed);
    }

    #[test]
    fn else_if_chains_stay_flat() {
        let printed = format("{\n  if a {\n    break\n  } else if b {\n    break\n  } else {\n    break\n  }\n}\n");
        assert!(
            printed.contains("if a {\n    break\n  } else if b {\n    break\n  } else {\n    break\n  }"),
            "{}",
            printed
        );
    }

    #[test]
    fn message_events_and_strings() {
        let printed = format("on 'go \"now\"'(data) {\n  Log.Message \"a\\tb\"\n}\n");
        assert!(printed.contains("on 'go \"now\"'(data) {\n  Log.Message \"a\\tb\"\n}"), "{}", printed);
    }

    #[test]
    fn comments_escape_newlines() {
        let node = AstNode::Comment(CommentNode {
            comment: "two\nlines".to_string(),
            loc: None,
        });
        assert_eq!(print_code(&node), "// two\\nlines");
    }

    #[test]
    fn unprintable_nodes_fall_back() {
        assert_eq!(print_code(&AstNode::error()), "<? Error>");
    }

    #[test]
    fn printing_does_not_mutate_input() {
        let node = AstNode::identifier("Math.sqrt", IdentifierKind::Unknown, vec![number("4")]);
        assert_eq!(print_code(&node), "Math.sqrt(4)");
        assert!(matches!(&node, AstNode::Identifier(identifier) if identifier.kind == IdentifierKind::Unknown));
    }
}
