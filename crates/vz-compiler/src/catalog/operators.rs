use super::{builtin_catalog, Arity, IdentifierDefinition};

/// Ceiling that never forces parentheses.
pub const DEFAULT_PRECEDENCE: u8 = 20;
pub const UNKNOWN_OPERATOR_PRECEDENCE: u8 = 19;

pub const KEYWORDS: &[&str] = &[
    "var",
    "list",
    "this",
    "local",
    "on",
    "def",
    "expression",
    "wait",
    "until",
    "if",
    "then",
    "else",
    "while",
    "for",
    "to",
    "step",
    "break",
    "repeat",
    "and",
    "or",
    "not",
    "true",
    "false",
];

const ARITHMETIC_OPS: &[(&str, &str)] = &[
    ("+", "op-add"),
    ("-", "op-sub"),
    ("*", "op-mul"),
    ("/", "op-div"),
    ("%", "op-mod"),
    ("^", "op-exp"),
];

const COMPARISON_OPS: &[(&str, &str)] = &[
    ("=", "op-eq"),
    ("g", "op-gt"),
    ("ge", "op-gte"),
    ("l", "op-lt"),
    ("le", "op-lte"),
];

const BOOLEAN_OPS: &[(&str, &str)] = &[("and", "op-and"), ("or", "op-or")];

pub(super) fn binary_op_definitions() -> Vec<IdentifierDefinition> {
    let groups = [
        ("BinaryOp", ARITHMETIC_OPS),
        ("Comparison", COMPARISON_OPS),
        ("BoolOp", BOOLEAN_OPS),
    ];
    groups
        .into_iter()
        .flat_map(|(element, ops)| {
            ops.iter().map(move |(op, style)| {
                IdentifierDefinition::new(*op, element, Arity::Exact(2)).attr("style", *style)
            })
        })
        .collect()
}

/// Schema entry for a canonical binary operator symbol.
pub fn binary_op_definition(op: &str) -> Option<&'static IdentifierDefinition> {
    builtin_catalog().binary_ops.get(op)
}

/// Binding strength of an operator; lower binds tighter.
pub fn precedence(op: &str) -> Option<u8> {
    let value = match op {
        "^" => 3,
        "*" | "/" | "%" => 5,
        "+" | "-" => 6,
        "=" | "g" | "ge" | "l" | "le" => 7,
        "not" => 8,
        "and" => 9,
        "or" => 10,
        "if" => 11,
        _ => return None,
    };
    Some(value)
}

pub fn is_right_associative(op: &str) -> bool {
    op == "^"
}

/// Text spelling of a canonical operator symbol.
pub fn display_symbol(op: &str) -> &str {
    match op {
        "=" => "==",
        "g" => ">",
        "ge" => ">=",
        "l" => "<",
        "le" => "<=",
        other => other,
    }
}

pub fn is_keyword(value: &str) -> bool {
    KEYWORDS.contains(&value)
}

#[cfg(test)]
mod operators_tests {
    use super::*;

    #[test]
    fn operator_elements_by_family() {
        let plus = binary_op_definition("+").expect("+");
        assert_eq!(plus.xml_element, "BinaryOp");
        assert_eq!(plus.static_attributes.get("style").map(String::as_str), Some("op-add"));
        assert_eq!(binary_op_definition("ge").map(|d| d.xml_element.as_str()), Some("Comparison"));
        assert_eq!(binary_op_definition("or").map(|d| d.xml_element.as_str()), Some("BoolOp"));
        assert!(binary_op_definition("xor").is_none());
    }

    #[test]
    fn precedence_orders_operators() {
        assert!(precedence("*") < precedence("+"));
        assert!(precedence("+") < precedence("l"));
        assert!(precedence("and") < precedence("or"));
        assert_eq!(precedence("??"), None);
    }

    #[test]
    fn comparison_symbols_are_spelled_out() {
        assert_eq!(display_symbol("="), "==");
        assert_eq!(display_symbol("le"), "<=");
        assert_eq!(display_symbol("and"), "and");
    }

    #[test]
    fn keyword_list_is_complete() {
        assert_eq!(KEYWORDS.len(), 23);
        assert!(is_keyword("repeat"));
        assert!(!is_keyword("Display"));
    }
}
