use vz_core::VzError;
use vz_parser::XmlElementNode;

use super::{quarantine, required_attr};
use crate::ast::*;
use crate::catalog::import_alias;

/// `op` values of a `BinaryOp` element that are math functions rather than
/// infix operators.
const BINARY_MATH_FUNCTIONS: &[&str] = &["rand", "min", "max", "atan2"];

pub(super) fn expression(element: Option<&XmlElementNode>) -> Result<AstNode, VzError> {
    let Some(element) = element else {
        return Ok(AstNode::error());
    };

    let attr = |name: &str| element.attr(name).unwrap_or_default();
    let node = match element.name.as_str() {
        "Constant" => constant(element),
        "MathFunction" => builtin(
            format!("Math.{}", attr("function")),
            vec![expression(element.first_element())?],
        ),
        "Vector" => builtin("Vec", children(element)?),
        "Variable" => {
            let kind = if element.attr("local") == Some("true") {
                IdentifierKind::Local
            } else {
                IdentifierKind::Global
            };
            AstNode::identifier(attr("variableName"), kind, Vec::new())
        }
        "BinaryOp" => {
            let op = element.attr("op").unwrap_or("+");
            if BINARY_MATH_FUNCTIONS.contains(&op) {
                builtin(format!("Math.{}", op), operands(element, 2)?)
            } else {
                binary(element, op)?
            }
        }
        "BoolOp" | "Comparison" => binary(element, element.attr("op").unwrap_or("+"))?,
        "StringOp" => {
            let op = attr("op");
            let identifier = match element.attr("subOp") {
                Some(sub_op) => format!("String.{}.{}", op, sub_op),
                None => format!("String.{}", op),
            };
            let mut arguments = children(element)?;
            // The exporter appends the terminator again.
            if op == "join" || op == "format" {
                arguments.pop();
            }
            builtin(identifier, arguments)
        }
        "VectorOp" => builtin(format!("Vec.{}", attr("op")), children(element)?),
        "ListOp" => builtin(format!("List.{}", attr("op")), children(element)?),
        "Planet" => builtin(format!("Planet.{}", attr("op")), children(element)?),
        "ActivationGroup" => builtin("AG.Get", children(element)?),
        "EvaluateExpression" => builtin("funk", vec![expression(element.first_element())?]),
        "Not" => AstNode::UnaryOp(UnaryOpNode {
            op: "not".to_string(),
            operand: Box::new(expression(element.first_element())?),
            loc: None,
        }),
        "Conditional" => {
            let mut parts = operands(element, 3)?.into_iter();
            let mut next = || Box::new(parts.next().unwrap_or_else(AstNode::error));
            AstNode::Conditional(ConditionalNode {
                condition: next(),
                consequent: next(),
                alternative: next(),
                loc: None,
            })
        }
        "CraftProperty" => {
            let property = required_attr(element, "property")?;
            builtin(import_alias(property), children(element)?)
        }
        "CallCustomExpression" => AstNode::identifier(
            required_attr(element, "call")?,
            IdentifierKind::Expression,
            children(element)?,
        ),
        _ => quarantine(element),
    };
    Ok(node)
}

fn builtin(identifier: impl Into<String>, arguments: Vec<AstNode>) -> AstNode {
    AstNode::identifier(identifier, IdentifierKind::Builtin, arguments)
}

fn children(element: &XmlElementNode) -> Result<Vec<AstNode>, VzError> {
    element
        .element_children()
        .map(|child| expression(Some(child)))
        .collect()
}

/// The first `count` element children; absent ones become `Error` nodes.
fn operands(element: &XmlElementNode, count: usize) -> Result<Vec<AstNode>, VzError> {
    let mut found = element.element_children();
    (0..count).map(|_| expression(found.next())).collect()
}

fn binary(element: &XmlElementNode, op: &str) -> Result<AstNode, VzError> {
    let mut parts = operands(element, 2)?.into_iter();
    let lhs = parts.next().unwrap_or_else(AstNode::error);
    let rhs = parts.next().unwrap_or_else(AstNode::error);
    Ok(AstNode::binary(op, lhs, rhs))
}

fn constant(element: &XmlElementNode) -> AstNode {
    let (value_type, value) = if let Some(number) = element.attr("number") {
        (LiteralType::Number, number)
    } else if let Some(value) = element.attr("bool") {
        (LiteralType::Bool, value)
    } else if let Some(vector) = element.attr("vector") {
        (LiteralType::Vector, vector)
    } else {
        (LiteralType::String, element.attr("text").unwrap_or_default())
    };
    AstNode::literal(value_type, value)
}

#[cfg(test)]
mod expression_tests {
    use super::*;
    use vz_parser::parse_xml_document;

    fn import(xml: &str) -> AstNode {
        let document = parse_xml_document(xml).expect("xml");
        expression(Some(&document.root)).expect("import")
    }

    fn name_and_kind(node: &AstNode) -> (String, IdentifierKind, usize) {
        match node {
            AstNode::Identifier(identifier) => (
                identifier.identifier.clone(),
                identifier.kind,
                identifier.arguments.len(),
            ),
            other => panic!("expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn constants_pick_their_type_from_the_attribute() {
        assert_eq!(import(r#"<Constant number="2.5" />"#), AstNode::number("2.5"));
        assert_eq!(
            import(r#"<Constant style="true" bool="true" />"#),
            AstNode::literal(LiteralType::Bool, "true")
        );
        assert_eq!(
            import(r#"<Constant vector="1,2,3" />"#),
            AstNode::literal(LiteralType::Vector, "1,2,3")
        );
        assert_eq!(import(r#"<Constant text="hi" />"#), AstNode::string("hi"));
        assert_eq!(import("<Constant />"), AstNode::string(""));
    }

    #[test]
    fn binary_math_functions_become_calls() {
        let node = import(r#"<BinaryOp op="max" style="op-max"><Constant number="1" /><Constant number="2" /></BinaryOp>"#);
        assert_eq!(name_and_kind(&node), ("Math.max".to_string(), IdentifierKind::Builtin, 2));

        let sum = import(r#"<BinaryOp op="+" style="op-add"><Constant number="1" /></BinaryOp>"#);
        let AstNode::BinaryOp(op) = sum else {
            panic!("expected binary op");
        };
        assert_eq!(op.op, "+");
        assert_eq!(*op.rhs, AstNode::error());
    }

    #[test]
    fn variadic_string_ops_drop_the_terminator() {
        let node = import(
            r#"<StringOp op="join" style="join"><Constant text="a" /><Constant text="b" /><Constant text="" /></StringOp>"#,
        );
        assert_eq!(name_and_kind(&node), ("String.join".to_string(), IdentifierKind::Builtin, 2));

        let friendly = import(r#"<StringOp op="friendly" subOp="distance" style="friendly"><Constant number="5" /></StringOp>"#);
        assert_eq!(
            name_and_kind(&friendly),
            ("String.friendly.distance".to_string(), IdentifierKind::Builtin, 1)
        );
    }

    #[test]
    fn variables_keep_scope() {
        let local = import(r#"<Variable list="false" local="true" variableName="data" />"#);
        assert_eq!(name_and_kind(&local), ("data".to_string(), IdentifierKind::Local, 0));
        let global = import(r#"<Variable list="false" local="false" variableName="speed" />"#);
        assert_eq!(name_and_kind(&global), ("speed".to_string(), IdentifierKind::Global, 0));
    }

    #[test]
    fn historical_property_names_are_renamed() {
        let node = import(r#"<CraftProperty property="Mfd.LocaltoDisplay" style="prop-mfd-pos"><Constant text="w" /><Constant vector="0,0" /></CraftProperty>"#);
        assert_eq!(
            name_and_kind(&node),
            ("Mfd.LocalToDisplay".to_string(), IdentifierKind::Builtin, 2)
        );
    }

    #[test]
    fn custom_expression_calls_need_a_name() {
        let call = import(r#"<CallCustomExpression call="twice" style="call-custom-expression"><Constant number="2" /></CallCustomExpression>"#);
        assert_eq!(name_and_kind(&call), ("twice".to_string(), IdentifierKind::Expression, 1));

        let document = parse_xml_document("<CallCustomExpression />").expect("xml");
        let error = expression(Some(&document.root)).expect_err("missing call");
        assert_eq!(error.code, "XML_IMPORT_MISSING_ATTR");
    }

    #[test]
    fn unknown_tags_are_quarantined() {
        let node = import(r#"<Telepathy style="magic" />"#);
        assert_eq!(
            node,
            AstNode::Error(ErrorNode {
                message: Some("Telepathy".to_string()),
                loc: None,
            })
        );
        assert_eq!(expression(None).expect("missing"), AstNode::error());
    }
}
