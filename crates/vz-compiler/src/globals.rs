use std::collections::BTreeMap;

use crate::ast::{AstNode, ProgramNode, VariableType};
use crate::catalog::{Arity, IdentifierDefinition};

/// User declarations of one program, as callable definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalSymbols {
    pub variables: BTreeMap<String, IdentifierDefinition>,
    pub instructions: BTreeMap<String, IdentifierDefinition>,
    pub expressions: BTreeMap<String, IdentifierDefinition>,
}

/// Derives the global symbols of `program`. Callers rescan on every entry so
/// edits to the tree are always reflected.
pub fn scan_globals(program: &ProgramNode) -> GlobalSymbols {
    let mut globals = GlobalSymbols::default();

    for declaration in &program.globals {
        let list = match declaration.variable_type {
            VariableType::List => "true",
            VariableType::Value => "false",
        };
        globals.variables.insert(
            declaration.identifier.clone(),
            IdentifierDefinition::new(&declaration.identifier, "Variable", Arity::Exact(0))
                .attr("list", list)
                .attr("local", "false")
                .attr("variableName", &declaration.identifier),
        );
    }

    for block in &program.body {
        match block {
            AstNode::InstructionDeclaration(declaration) => {
                globals.instructions.insert(
                    declaration.identifier.clone(),
                    IdentifierDefinition::new(
                        &declaration.identifier,
                        "CallCustomInstruction",
                        Arity::Exact(declaration.parameters.len()),
                    )
                    .attr("call", &declaration.identifier)
                    .attr("style", "call-custom-instruction"),
                );
            }
            AstNode::ExpressionDeclaration(declaration) => {
                globals.expressions.insert(
                    declaration.identifier.clone(),
                    IdentifierDefinition::new(
                        &declaration.identifier,
                        "CallCustomExpression",
                        Arity::Exact(declaration.parameters.len()),
                    )
                    .attr("call", &declaration.identifier)
                    .attr("style", "call-custom-expression"),
                );
            }
            _ => {}
        }
    }

    globals
}
