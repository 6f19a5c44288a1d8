//! Builtin identifier catalog.
//!
//! Maps every builtin identifier to the XML element it becomes, the static
//! attributes that element carries and the number of arguments it takes. The
//! tables are built once per process and never change afterwards.

mod events;
mod expressions;
mod instructions;
mod operators;
pub mod tables;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::ast::AstNode;

pub use events::{event_definition, event_definitions, EventDefinition};
pub use operators::{
    binary_op_definition, display_symbol, is_keyword, is_right_associative, precedence,
    DEFAULT_PRECEDENCE, KEYWORDS, UNKNOWN_OPERATOR_PRECEDENCE,
};

/// Expected argument count of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(expected) => expected == count,
            Self::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) => write!(f, "{}", expected),
            Self::Variadic => f.write_str("-1"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierDefinition {
    pub identifier: String,
    pub xml_element: String,
    pub static_attributes: BTreeMap<String, String>,
    /// Implicit arguments appended after the caller's own on export.
    pub static_arguments_post: Vec<AstNode>,
    pub arity: Arity,
}

impl IdentifierDefinition {
    pub fn new(identifier: impl Into<String>, xml_element: impl Into<String>, arity: Arity) -> Self {
        Self {
            identifier: identifier.into(),
            xml_element: xml_element.into(),
            static_attributes: BTreeMap::new(),
            static_arguments_post: Vec::new(),
            arity,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_attributes.insert(name.into(), value.into());
        self
    }

    pub fn post_argument(mut self, node: AstNode) -> Self {
        self.static_arguments_post.push(node);
        self
    }
}

#[derive(Debug)]
pub struct BuiltinCatalog {
    pub expressions: BTreeMap<String, IdentifierDefinition>,
    pub instructions: BTreeMap<String, IdentifierDefinition>,
    binary_ops: BTreeMap<String, IdentifierDefinition>,
}

impl BuiltinCatalog {
    fn build() -> Self {
        Self {
            expressions: index(expressions::expression_definitions()),
            instructions: index(instructions::instruction_definitions()),
            binary_ops: index(operators::binary_op_definitions()),
        }
    }

    pub fn expression(&self, identifier: &str) -> Option<&IdentifierDefinition> {
        self.expressions.get(identifier)
    }

    pub fn instruction(&self, identifier: &str) -> Option<&IdentifierDefinition> {
        self.instructions.get(identifier)
    }
}

/// Later entries replace earlier ones with the same identifier.
fn index(definitions: Vec<IdentifierDefinition>) -> BTreeMap<String, IdentifierDefinition> {
    definitions
        .into_iter()
        .map(|definition| (definition.identifier.clone(), definition))
        .collect()
}

pub fn builtin_catalog() -> &'static BuiltinCatalog {
    static CATALOG: OnceLock<BuiltinCatalog> = OnceLock::new();
    CATALOG.get_or_init(BuiltinCatalog::build)
}

/// Identifiers renamed since older documents were written, applied on import.
pub fn import_alias(identifier: &str) -> &str {
    match identifier {
        "Mfd.LocaltoDisplay" => "Mfd.LocalToDisplay",
        other => other,
    }
}
