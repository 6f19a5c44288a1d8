/// Escapes `value` for a string literal delimited by `quote`.
pub fn escape_string(value: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            '\\' => escaped.push_str("\\\\"),
            ch if ch == quote => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ch => escaped.push(ch),
        }
    }
    escaped
}

/// Resolves `\' \" \t \r \n \\`; any other backslash sequence is kept as is.
pub fn unescape_string(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }
        let replacement = match chars.peek() {
            Some('\'') => '\'',
            Some('"') => '"',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('n') => '\n',
            Some('\\') => '\\',
            _ => {
                unescaped.push(ch);
                continue;
            }
        };
        chars.next();
        unescaped.push(replacement);
    }
    unescaped
}

/// Content of a raw string token with its delimiters removed and escapes
/// resolved.
pub fn string_token_value(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    unescape_string(chars.as_str())
}

/// Quotes `value` as a source string literal. Single quotes are used only
/// when the value contains a double quote and no single quote.
pub fn print_string(value: &str) -> String {
    if value.contains('"') && !value.contains('\'') {
        format!("'{}'", escape_string(value, '\''))
    } else {
        format!("\"{}\"", escape_string(value, '"'))
    }
}

#[cfg(test)]
mod strings_tests {
    use super::*;

    #[test]
    fn quote_choice() {
        assert_eq!(print_string("plain"), "\"plain\"");
        assert_eq!(print_string("say \"hi\""), "'say \"hi\"'");
        assert_eq!(print_string("it's \"x\""), "\"it's \\\"x\\\"\"");
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(escape_string("a\tb\nc\\", '"'), "a\\tb\\nc\\\\");
    }

    #[test]
    fn unescape_keeps_unknown_sequences() {
        assert_eq!(unescape_string(r"a\x\n\\"), "a\\x\n\\");
        assert_eq!(unescape_string(r"trailing\"), "trailing\\");
    }

    #[test]
    fn token_value_strips_delimiters() {
        assert_eq!(string_token_value(r#""a\"b""#), "a\"b");
        assert_eq!(string_token_value("'c'"), "c");
        assert_eq!(string_token_value("\"\""), "");
    }

    #[test]
    fn printed_strings_read_back() {
        for value in ["x", "tab\there", "both ' and \"", "only \"double\"", "back\\slash"] {
            let printed = print_string(value);
            assert_eq!(string_token_value(&printed), value);
        }
    }
}
