//! Flight-program XML to AST.
//!
//! Elements are dispatched on their tag. A tag without a handler becomes an
//! `Error` node carrying the tag, so one unknown element never fails the
//! document. A handler whose required attribute is missing fails the whole
//! import with `XML_IMPORT_MISSING_ATTR`.

mod expression;
mod root;
mod statement;

use log::{debug, warn};
use vz_core::VzError;
use vz_parser::{parse_xml_document, XmlElementNode};

use crate::ast::AstNode;

/// Imports a `Program` document. Any other root element yields `None`.
pub fn import_xml(root: &XmlElementNode) -> Result<Option<AstNode>, VzError> {
    if root.name != "Program" {
        debug!(root = root.name.as_str(); "xml root is not a program");
        return Ok(None);
    }
    root::program(root).map(Some)
}

pub fn import_xml_str(source: &str) -> Result<Option<AstNode>, VzError> {
    let document = parse_xml_document(source)?;
    import_xml(&document.root)
}

fn required_attr<'a>(element: &'a XmlElementNode, name: &str) -> Result<&'a str, VzError> {
    element.attr(name).ok_or_else(|| {
        VzError::with_span(
            "XML_IMPORT_MISSING_ATTR",
            format!("Attribute \"{}\" is required on <{}>.", name, element.name),
            element.location,
        )
    })
}

fn quarantine(element: &XmlElementNode) -> AstNode {
    warn!(tag = element.name.as_str(), line = element.location.start.line; "unknown element");
    AstNode::Error(crate::ast::ErrorNode {
        message: Some(element.name.clone()),
        loc: None,
    })
}
