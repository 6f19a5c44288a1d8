use std::collections::BTreeMap;

use roxmltree::{Document, Node, NodeType};
use vz_core::{SourceLocation, SourceSpan, VzError};

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElementNode),
    Text(XmlTextNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
    pub location: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlTextNode {
    pub value: String,
    pub location: SourceSpan,
}

impl XmlElementNode {
    /// Element built in memory rather than read from a document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            location: SourceSpan::synthetic(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn push(&mut self, child: XmlElementNode) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn element_children(&self) -> impl Iterator<Item = &XmlElementNode> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn first_element(&self) -> Option<&XmlElementNode> {
        self.element_children().next()
    }

    pub fn child_named(&self, name: &str) -> Option<&XmlElementNode> {
        self.element_children().find(|child| child.name == name)
    }
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, VzError> {
    let document = Document::parse(source)
        .map_err(|error| VzError::new("XML_PARSE_ERROR", error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(VzError::new(
            "XML_PARSE_ERROR",
            "XML document must contain a root element.",
        ));
    };

    Ok(XmlDocument {
        root: parse_element(&document, root),
    })
}

fn parse_element(document: &Document<'_>, node: Node<'_, '_>) -> XmlElementNode {
    let attributes = node
        .attributes()
        .map(|attribute| (attribute.name().to_string(), attribute.value().to_string()))
        .collect::<BTreeMap<_, _>>();

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(XmlNode::Element(parse_element(document, child))),
            NodeType::Text => {
                let value = child.text().unwrap_or_default();
                // Indentation between elements carries no meaning in this schema.
                if value.trim().is_empty() {
                    continue;
                }
                children.push(XmlNode::Text(XmlTextNode {
                    value: value.to_string(),
                    location: node_span(document, child.range().start, child.range().end),
                }));
            }
            _ => {}
        }
    }

    XmlElementNode {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        location: node_span(document, node.range().start, node.range().end),
    }
}

fn node_span(document: &Document<'_>, start: usize, end: usize) -> SourceSpan {
    let start_pos = document.text_pos_at(start);
    let end_pos = document.text_pos_at(end);
    SourceSpan::new(
        SourceLocation::new(start_pos.row as usize, start_pos.col as usize),
        SourceLocation::new(end_pos.row as usize, end_pos.col as usize),
    )
}

/// Serializes `root` as a standalone document with two-space indentation.
pub fn to_xml_string(root: &XmlElementNode) -> String {
    let mut out = String::from(XML_HEADER);
    out.push('\n');
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &XmlElementNode, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_xml(value, true));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" />\n");
        return;
    }

    let text_only = element
        .children
        .iter()
        .all(|child| matches!(child, XmlNode::Text(_)));
    if text_only {
        out.push('>');
        for child in &element.children {
            if let XmlNode::Text(text) = child {
                out.push_str(&escape_xml(&text.value, false));
            }
        }
    } else {
        out.push_str(">\n");
        for child in &element.children {
            match child {
                XmlNode::Element(child) => write_element(out, child, depth + 1),
                XmlNode::Text(text) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&escape_xml(&text.value, false));
                    out.push('\n');
                }
            }
        }
        out.push_str(&indent);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn escape_xml(value: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\'' if attribute => escaped.push_str("&apos;"),
            '\n' if attribute => escaped.push_str("&#xA;"),
            '\r' if attribute => escaped.push_str("&#xD;"),
            '\t' if attribute => escaped.push_str("&#x9;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod xml_tests {
    use super::*;

    #[test]
    fn parse_xml_document_builds_tree_with_attributes() {
        let source = r#"<Program name="demo"><Variables><Variable name="x" number="0" /></Variables></Program>"#;
        let document = parse_xml_document(source).expect("xml should parse");
        assert_eq!(document.root.name, "Program");
        assert_eq!(document.root.attr("name"), Some("demo"));

        let variables = document
            .root
            .child_named("Variables")
            .expect("variables element");
        let variable = variables.first_element().expect("variable element");
        assert_eq!(variable.attr("number"), Some("0"));
        assert!(document.root.location.start.line >= 1);
    }

    #[test]
    fn parse_xml_document_skips_indentation_text() {
        let source = "<Program>\n  <Variables />\n  <Instructions />\n</Program>";
        let document = parse_xml_document(source).expect("xml should parse");
        assert_eq!(document.root.children.len(), 2);
        assert_eq!(document.root.element_children().count(), 2);
    }

    #[test]
    fn parse_xml_document_returns_parse_error_for_invalid_xml() {
        let error = parse_xml_document("<Program>").expect_err("invalid xml should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");
    }

    #[test]
    fn parse_xml_document_returns_parse_error_when_root_element_is_missing() {
        let error = parse_xml_document("<?xml version=\"1.0\"?><!---->")
            .expect_err("missing root element should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");
    }

    #[test]
    fn writer_escapes_attribute_values() {
        let root = XmlElementNode::new("Constant").with_attr("text", "a<\"b\"> & 'c'\n");
        let xml = to_xml_string(&root);
        assert_eq!(
            xml,
            format!(
                "{}\n<Constant text=\"a&lt;&quot;b&quot;&gt; &amp; &apos;c&apos;&#xA;\" />\n",
                XML_HEADER
            )
        );

        let reparsed = parse_xml_document(&xml).expect("written xml should parse");
        assert_eq!(reparsed.root.attr("text"), Some("a<\"b\"> & 'c'\n"));
    }

    #[test]
    fn writer_indents_nested_elements() {
        let mut program = XmlElementNode::new("Program").with_attr("name", "p");
        program.push(XmlElementNode::new("Variables"));
        let mut instructions = XmlElementNode::new("Instructions");
        instructions.push(XmlElementNode::new("Break").with_attr("style", "break"));
        program.push(instructions);

        let xml = to_xml_string(&program);
        let expected = [
            XML_HEADER,
            "<Program name=\"p\">",
            "  <Variables />",
            "  <Instructions>",
            "    <Break style=\"break\" />",
            "  </Instructions>",
            "</Program>",
            "",
        ]
        .join("\n");
        assert_eq!(xml, expected);
    }
}
