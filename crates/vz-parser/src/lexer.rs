use logos::Logos;
use vz_core::{ProblemLog, SourceLocation, SourceSpan};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    #[token("var")]
    Var,
    #[token("list")]
    List,
    #[token("this")]
    This,
    #[token("local")]
    Local,
    #[token("on")]
    On,
    #[token("def")]
    Def,
    #[token("expression")]
    Expression,
    #[token("wait")]
    Wait,
    #[token("until")]
    Until,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("to")]
    To,
    #[token("step")]
    Step,
    #[token("break")]
    Break,
    #[token("repeat")]
    Repeat,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][-+]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][-+]?[0-9]+)?")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,
    #[regex(r"//[^\n]*")]
    Comment,
    #[token("\n")]
    Newline,

    #[token("#")]
    Hash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("==")]
    EqEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
}

impl Token {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Token::Var
                | Token::List
                | Token::This
                | Token::Local
                | Token::On
                | Token::Def
                | Token::Expression
                | Token::Wait
                | Token::Until
                | Token::If
                | Token::Then
                | Token::Else
                | Token::While
                | Token::For
                | Token::To
                | Token::Step
                | Token::Break
                | Token::Repeat
                | Token::And
                | Token::Or
                | Token::Not
                | Token::True
                | Token::False
        )
    }

    /// Words and keywords; member names after a `.` may be either.
    pub fn is_word_like(self) -> bool {
        self == Token::Word || self.is_keyword()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    pub span: SourceSpan,
}

/// Maps byte offsets to 1-based line/column positions.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    fn location(&self, offset: usize) -> SourceLocation {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let column = self.source[self.line_starts[line]..offset].chars().count() + 1;
        SourceLocation::new(line + 1, column)
    }
}

/// Tokenizes `source`. Newlines and comments nested inside parentheses are
/// dropped so that argument lists may span lines; unrecognized characters are
/// reported to `log` and skipped.
pub fn tokenize(source: &str, log: &mut ProblemLog) -> Vec<Lexeme> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut lexemes = Vec::new();
    let mut paren_depth = 0usize;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let start = index.location(range.start);
        let end = index.location(range.end);
        match result {
            Ok(token) => {
                match token {
                    Token::LParen => paren_depth += 1,
                    Token::RParen => paren_depth = paren_depth.saturating_sub(1),
                    Token::Newline | Token::Comment if paren_depth > 0 => continue,
                    _ => {}
                }
                lexemes.push(Lexeme {
                    token,
                    text: lexer.slice().to_string(),
                    span: SourceSpan::new(start, end),
                });
            }
            Err(()) => {
                log.error(
                    format!("token recognition error at: '{}'", lexer.slice()),
                    Some(start),
                    Some(end),
                );
            }
        }
    }

    lexemes
}
