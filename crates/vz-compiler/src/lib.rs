//! The vztxt core: a shared AST between the vztxt text language and the
//! flight-program XML schema, with a builder from the text grammar's CST, a
//! canonical text printer, an XML exporter, and an XML importer.

pub mod ast;
pub mod builder;
pub mod catalog;
pub mod export;
pub mod globals;
pub mod import;
pub mod pipeline;
pub mod printer;
pub mod resolve;
pub mod strings;
pub mod symbols;

pub use ast::*;
pub use builder::build_program;
pub use export::{export_xml, export_xml_string};
pub use globals::{scan_globals, GlobalSymbols};
pub use import::{import_xml, import_xml_str};
pub use pipeline::{format_source, parse_and_validate, text_to_xml, xml_to_text};
pub use printer::print_code;
pub use resolve::validate_identifiers;
pub use symbols::{enter_scope, ScopeHost, SymbolTable};
