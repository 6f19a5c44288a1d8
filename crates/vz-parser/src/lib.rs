//! Collaborators of the vztxt core: the text tokenizer and grammar parser
//! producing a concrete syntax tree, and the XML document layer.

pub mod cst;
pub mod lexer;
pub mod text_parser;
pub mod xml;

pub use cst::*;
pub use lexer::{tokenize, Lexeme, Token};
pub use text_parser::parse_program;
pub use xml::{parse_xml_document, to_xml_string, XmlDocument, XmlElementNode, XmlNode, XmlTextNode};
