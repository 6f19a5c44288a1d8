use log::debug;
use vz_core::{ProblemLog, SourceLocation, SourceSpan};

use crate::cst::*;
use crate::lexer::{tokenize, Lexeme, Token};

/// Parses vztxt source into a concrete syntax tree.
///
/// Syntax errors are posted to `log`; the parser resynchronizes at the next
/// line or closing brace and leaves the affected children empty.
pub fn parse_program(source: &str, log: &mut ProblemLog) -> CstProgram {
    let lexemes = tokenize(source, log);
    debug!(tokens = lexemes.len(); "tokenized vztxt source");
    let end = lexemes
        .last()
        .map(|lexeme| lexeme.span.end)
        .unwrap_or(SourceLocation::new(1, 1));
    let mut parser = Parser {
        lexemes,
        pos: 0,
        last_end: SourceLocation::new(1, 1),
        eof: end,
        log,
    };
    parser.program()
}

struct Parser<'a> {
    lexemes: Vec<Lexeme>,
    pos: usize,
    last_end: SourceLocation,
    eof: SourceLocation,
    log: &'a mut ProblemLog,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.lexemes.get(self.pos).map(|lexeme| lexeme.token)
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.lexemes.get(self.pos + offset).map(|lexeme| lexeme.token)
    }

    fn at(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn start(&self) -> SourceLocation {
        self.lexemes
            .get(self.pos)
            .map(|lexeme| lexeme.span.start)
            .unwrap_or(self.eof)
    }

    fn span_from(&self, start: SourceLocation) -> SourceSpan {
        SourceSpan::new(start, self.last_end.max(start))
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned()?;
        self.pos += 1;
        self.last_end = lexeme.span.end;
        Some(lexeme)
    }

    fn eat(&mut self, token: Token) -> Option<Lexeme> {
        if self.at(token) {
            self.bump()
        } else {
            None
        }
    }

    fn describe_current(&self) -> String {
        match self.lexemes.get(self.pos) {
            Some(lexeme) if lexeme.token == Token::Newline => "'\\n'".to_string(),
            Some(lexeme) => format!("'{}'", lexeme.text),
            None => "<EOF>".to_string(),
        }
    }

    fn error_here(&mut self, message: String) {
        let (start, end) = match self.lexemes.get(self.pos) {
            Some(lexeme) => (lexeme.span.start, lexeme.span.end),
            None => (self.eof, self.eof),
        };
        self.log.error(message, Some(start), Some(end));
    }

    fn expect(&mut self, token: Token, expected: &str) -> Option<Lexeme> {
        if let Some(lexeme) = self.eat(token) {
            return Some(lexeme);
        }
        let message = format!(
            "mismatched input {} expecting {}",
            self.describe_current(),
            expected
        );
        self.error_here(message);
        None
    }

    fn skip_newlines(&mut self) {
        while self.eat(Token::Newline).is_some() {}
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::Newline) | Some(Token::RBrace) | Some(Token::Comment)
        )
    }

    /// Skips to the end of the current line, or to a closing brace when
    /// `stop_at_brace` is set.
    fn recover(&mut self, stop_at_brace: bool) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::Newline if depth == 0 => return,
                Token::RBrace if depth == 0 && stop_at_brace => return,
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
    }

    fn program(&mut self) -> CstProgram {
        let mut elements = Vec::new();
        while let Some(token) = self.peek() {
            let element = match token {
                Token::Newline | Token::Comment => {
                    self.bump();
                    continue;
                }
                Token::Hash => CstTopLevel::Directive(self.directive()),
                Token::Var | Token::List => CstTopLevel::VarDeclaration(self.var_declaration()),
                Token::On => CstTopLevel::Event(self.event()),
                Token::Def if self.peek_at(1) == Some(Token::Expression) => {
                    CstTopLevel::DefExpression(self.def_expression())
                }
                Token::Def => CstTopLevel::Def(self.def()),
                Token::LBrace => CstTopLevel::Block(self.block()),
                _ => {
                    let message = format!("extraneous input {} at top level", self.describe_current());
                    self.error_here(message);
                    self.bump();
                    self.recover(false);
                    continue;
                }
            };
            elements.push(element);
            self.expect_line_end(false);
        }
        CstProgram { elements }
    }

    fn expect_line_end(&mut self, in_block: bool) {
        if self.at_statement_end() {
            return;
        }
        let message = format!("extraneous input {} expecting end of line", self.describe_current());
        self.error_here(message);
        self.recover(in_block);
    }

    fn directive(&mut self) -> CstDirective {
        let start = self.start();
        self.bump();
        let name = match self.peek() {
            Some(token) if token.is_word_like() => self.bump().map(|lexeme| lexeme.text),
            _ => {
                let message = format!("mismatched input {} expecting directive name", self.describe_current());
                self.error_here(message);
                None
            }
        };
        let value = self.eat(Token::String).map(|lexeme| lexeme.text);
        CstDirective {
            name,
            value,
            span: self.span_from(start),
        }
    }

    fn decl_name(&mut self) -> Option<CstDeclName> {
        let start = self.start();
        if let Some(lexeme) = self.eat(Token::String) {
            return Some(CstDeclName {
                kind: CstNameKind::Quoted(lexeme.text),
                span: lexeme.span,
            });
        }
        let first = self.expect(Token::Word, "a name")?;
        let dotted = self.dotted_tail(first.text);
        Some(CstDeclName {
            kind: CstNameKind::Word(dotted),
            span: self.span_from(start),
        })
    }

    /// Continues a dotted name; any word or keyword may follow a `.`.
    fn dotted_tail(&mut self, mut name: String) -> String {
        while self.at(Token::Dot) && self.peek_at(1).is_some_and(Token::is_word_like) {
            self.bump();
            if let Some(part) = self.bump() {
                name.push('.');
                name.push_str(&part.text);
            }
        }
        name
    }

    fn parameters(&mut self) -> Option<CstParameters> {
        if !self.at(Token::LParen) {
            return None;
        }
        let start = self.start();
        self.bump();
        let mut names = Vec::new();
        if !self.at(Token::RParen) {
            loop {
                if let Some(name) = self.decl_name() {
                    names.push(name);
                }
                if self.eat(Token::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'");
        Some(CstParameters {
            names,
            span: self.span_from(start),
        })
    }

    fn var_declaration(&mut self) -> CstVarDeclaration {
        let start = self.start();
        let is_list = self.bump().is_some_and(|lexeme| lexeme.token == Token::List);
        let name = self.decl_name();
        CstVarDeclaration {
            is_list,
            name,
            span: self.span_from(start),
        }
    }

    fn event(&mut self) -> CstEvent {
        let start = self.start();
        self.bump();
        let name = match self.peek() {
            Some(Token::Word) => self.bump().map(|lexeme| CstEventName::Word(lexeme.text)),
            Some(Token::String) => self.bump().map(|lexeme| CstEventName::Message(lexeme.text)),
            _ => {
                let message = format!("mismatched input {} expecting event name", self.describe_current());
                self.error_here(message);
                None
            }
        };
        let parameters = self.parameters();
        let body = self.block_after_header();
        CstEvent {
            name,
            parameters,
            body,
            span: self.span_from(start),
        }
    }

    fn def(&mut self) -> CstDef {
        let start = self.start();
        self.bump();
        let name = self.decl_name();
        let parameters = self.parameters();
        let body = self.block_after_header();
        CstDef {
            name,
            parameters,
            body,
            span: self.span_from(start),
        }
    }

    fn def_expression(&mut self) -> CstDefExpression {
        let start = self.start();
        self.bump();
        self.bump();
        let name = self.decl_name();
        let parameters = self.parameters();
        let value = if self.expect(Token::Colon, "':'").is_some() {
            self.expression()
        } else {
            None
        };
        CstDefExpression {
            name,
            parameters,
            value,
            span: self.span_from(start),
        }
    }

    fn block_after_header(&mut self) -> Option<CstBlock> {
        let mark = self.pos;
        self.skip_newlines();
        if self.at(Token::LBrace) {
            Some(self.block())
        } else {
            self.pos = mark;
            self.expect(Token::LBrace, "'{'");
            None
        }
    }

    fn block(&mut self) -> CstBlock {
        let start = self.start();
        self.bump();
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                None => {
                    self.error_here("missing '}' at <EOF>".to_string());
                    break;
                }
                Some(Token::RBrace) => {
                    self.bump();
                    break;
                }
                Some(Token::Newline) => {
                    self.bump();
                }
                Some(Token::Comment) => {
                    if let Some(lexeme) = self.bump() {
                        statements.push(CstStatement::Comment {
                            text: lexeme.text,
                            span: lexeme.span,
                        });
                    }
                }
                Some(_) => {
                    match self.statement() {
                        Some(statement) => {
                            statements.push(statement);
                            self.expect_line_end(true);
                        }
                        None => self.recover(true),
                    }
                }
            }
        }
        CstBlock {
            statements,
            span: self.span_from(start),
        }
    }

    fn statement(&mut self) -> Option<CstStatement> {
        match self.peek()? {
            Token::If => Some(CstStatement::If(self.if_statement())),
            Token::While => Some(CstStatement::While(self.loop_statement())),
            Token::Repeat => Some(CstStatement::Repeat(self.loop_statement())),
            Token::For => Some(CstStatement::For(self.for_statement())),
            Token::Break => self.bump().map(|lexeme| CstStatement::Break { span: lexeme.span }),
            Token::Wait => Some(CstStatement::Wait(self.wait_statement())),
            Token::LParen => {
                let start = self.start();
                self.bump();
                let inner = self.expression();
                self.expect(Token::RParen, "')'");
                Some(CstStatement::Assign(
                    self.assignment(start, CstAssignTarget::Parenthesized(inner))?,
                ))
            }
            Token::Word | Token::This | Token::Var | Token::Local => {
                let start = self.start();
                let identifier = self.identifier()?;
                if matches!(self.peek(), Some(Token::Assign) | Some(Token::PlusAssign)) {
                    return Some(CstStatement::Assign(
                        self.assignment(start, CstAssignTarget::Identifier(identifier))?,
                    ));
                }
                let arguments = self.instruction_arguments();
                Some(CstStatement::Instruction(CstInstruction {
                    identifier,
                    arguments,
                    span: self.span_from(start),
                }))
            }
            _ => {
                let message = format!("extraneous input {} expecting statement", self.describe_current());
                self.error_here(message);
                None
            }
        }
    }

    fn assignment(&mut self, start: SourceLocation, target: CstAssignTarget) -> Option<CstAssign> {
        let operator = match self.peek() {
            Some(token @ (Token::Assign | Token::PlusAssign)) => {
                self.bump();
                token
            }
            _ => {
                let message = format!("mismatched input {} expecting '=' or '+='", self.describe_current());
                self.error_here(message);
                return None;
            }
        };
        let value = self.expression();
        Some(CstAssign {
            target,
            operator,
            value,
            span: self.span_from(start),
        })
    }

    fn instruction_arguments(&mut self) -> CstArguments {
        if self.at_statement_end() {
            return CstArguments::None;
        }
        if self.at(Token::LParen) {
            let mark = self.pos;
            let saved_end = self.last_end;
            let problem_mark = self.log.problems.len();
            if let Some(arguments) = self.argument_list() {
                if self.at_statement_end() && self.log.problems.len() == problem_mark {
                    return CstArguments::List(arguments);
                }
            }
            self.pos = mark;
            self.last_end = saved_end;
            self.log.problems.truncate(problem_mark);
        }
        match self.expression() {
            Some(expression) => CstArguments::Single(expression),
            None => CstArguments::None,
        }
    }

    fn argument_list(&mut self) -> Option<Vec<CstExpression>> {
        self.expect(Token::LParen, "'('")?;
        let mut arguments = Vec::new();
        if self.eat(Token::RParen).is_some() {
            return Some(arguments);
        }
        loop {
            arguments.push(self.expression()?);
            if self.eat(Token::Comma).is_none() {
                break;
            }
        }
        self.expect(Token::RParen, "')'")?;
        Some(arguments)
    }

    fn if_statement(&mut self) -> CstIf {
        let start = self.start();
        self.bump();
        let condition = self.expression();
        self.eat(Token::Then);
        let consequent = self.block_after_header();

        let mark = self.pos;
        let saved_end = self.last_end;
        self.skip_newlines();
        let alternative = if self.eat(Token::Else).is_some() {
            if self.at(Token::If) {
                Some(CstElse::ElseIf(Box::new(self.if_statement())))
            } else {
                self.block_after_header().map(CstElse::Else)
            }
        } else {
            self.pos = mark;
            self.last_end = saved_end;
            None
        };

        CstIf {
            condition,
            consequent,
            alternative,
            span: self.span_from(start),
        }
    }

    fn loop_statement(&mut self) -> CstLoop {
        let start = self.start();
        self.bump();
        let head = self.expression();
        let body = self.block_after_header();
        CstLoop {
            head,
            body,
            span: self.span_from(start),
        }
    }

    fn for_statement(&mut self) -> CstFor {
        let start = self.start();
        self.bump();
        let var = self.decl_name();
        let from = self
            .expect(Token::Assign, "'='")
            .and_then(|_| self.expression());
        let to = self
            .expect(Token::To, "'to'")
            .and_then(|_| self.expression());
        let step = self.eat(Token::Step).and_then(|_| self.expression());
        let body = self.block_after_header();
        CstFor {
            var,
            start: from,
            end: to,
            step,
            body,
            span: self.span_from(start),
        }
    }

    fn wait_statement(&mut self) -> CstWait {
        let start = self.start();
        self.bump();
        let until = self.eat(Token::Until).is_some();
        let condition = if !until && self.at_statement_end() {
            None
        } else {
            self.expression()
        };
        CstWait {
            until,
            condition,
            span: self.span_from(start),
        }
    }

    fn identifier(&mut self) -> Option<CstIdentifier> {
        let start = self.start();
        let qualifier = match self.peek() {
            Some(Token::This) => Some(CstQualifier::This),
            Some(Token::Var) => Some(CstQualifier::Var),
            Some(Token::Local) => Some(CstQualifier::Local),
            _ => None,
        };

        let member = if qualifier.is_some() {
            self.bump();
            self.expect(Token::Dot, "'.'")?;
            match self.peek() {
                Some(Token::String) => self.bump().map(|lexeme| CstMember::Quoted(lexeme.text)),
                Some(token) if token.is_word_like() => {
                    let first = self.bump()?;
                    Some(CstMember::Word(self.dotted_tail(first.text)))
                }
                _ => {
                    let message = format!("mismatched input {} expecting member name", self.describe_current());
                    self.error_here(message);
                    None
                }
            }
        } else {
            let first = self.expect(Token::Word, "identifier")?;
            Some(CstMember::Word(self.dotted_tail(first.text)))
        };

        Some(CstIdentifier {
            qualifier,
            member,
            span: self.span_from(start),
        })
    }

    fn expression(&mut self) -> Option<CstExpression> {
        if self.at(Token::If) {
            return self.conditional();
        }
        self.or_expression()
    }

    fn conditional(&mut self) -> Option<CstExpression> {
        let start = self.start();
        self.bump();
        let condition = self.expression().map(Box::new);
        let consequent = self
            .expect(Token::Then, "'then'")
            .and_then(|_| self.expression())
            .map(Box::new);
        let alternative = self
            .expect(Token::Else, "'else'")
            .and_then(|_| self.expression())
            .map(Box::new);
        Some(CstExpression {
            kind: CstExpressionKind::Conditional {
                condition,
                consequent,
                alternative,
            },
            span: self.span_from(start),
        })
    }

    fn binary_level(
        &mut self,
        operators: &[Token],
        operand: fn(&mut Self) -> Option<CstExpression>,
    ) -> Option<CstExpression> {
        let start = self.start();
        let mut lhs = operand(self)?;
        while let Some(operator) = self.peek().filter(|token| operators.contains(token)) {
            self.bump();
            let rhs = operand(self);
            lhs = CstExpression {
                kind: CstExpressionKind::Binary {
                    operator,
                    lhs: Some(Box::new(lhs)),
                    rhs: rhs.map(Box::new),
                },
                span: self.span_from(start),
            };
        }
        Some(lhs)
    }

    fn or_expression(&mut self) -> Option<CstExpression> {
        self.binary_level(&[Token::Or], Self::and_expression)
    }

    fn and_expression(&mut self) -> Option<CstExpression> {
        self.binary_level(&[Token::And], Self::not_expression)
    }

    fn not_expression(&mut self) -> Option<CstExpression> {
        if !self.at(Token::Not) {
            return self.comparison();
        }
        let start = self.start();
        self.bump();
        let operand = self.not_expression().map(Box::new);
        Some(CstExpression {
            kind: CstExpressionKind::Not(operand),
            span: self.span_from(start),
        })
    }

    fn comparison(&mut self) -> Option<CstExpression> {
        self.binary_level(
            &[Token::EqEq, Token::Gt, Token::GtEq, Token::Lt, Token::LtEq],
            Self::additive,
        )
    }

    fn additive(&mut self) -> Option<CstExpression> {
        self.binary_level(&[Token::Plus, Token::Minus], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Option<CstExpression> {
        self.binary_level(&[Token::Star, Token::Slash, Token::Percent], Self::power)
    }

    fn power(&mut self) -> Option<CstExpression> {
        let start = self.start();
        let base = self.primary()?;
        if self.eat(Token::Caret).is_none() {
            return Some(base);
        }
        let exponent = self.power();
        Some(CstExpression {
            kind: CstExpressionKind::Binary {
                operator: Token::Caret,
                lhs: Some(Box::new(base)),
                rhs: exponent.map(Box::new),
            },
            span: self.span_from(start),
        })
    }

    fn primary(&mut self) -> Option<CstExpression> {
        let start = self.start();
        let kind = match self.peek() {
            Some(Token::Number) => {
                let digits = self.bump()?.text;
                CstExpressionKind::Literal(CstLiteral::Number {
                    negative: false,
                    digits,
                })
            }
            Some(Token::Minus) if self.peek_at(1) == Some(Token::Number) => {
                self.bump();
                let digits = self.bump()?.text;
                CstExpressionKind::Literal(CstLiteral::Number {
                    negative: true,
                    digits,
                })
            }
            Some(Token::String) => CstExpressionKind::Literal(CstLiteral::String(self.bump()?.text)),
            Some(Token::True) => {
                self.bump();
                CstExpressionKind::Literal(CstLiteral::Bool(true))
            }
            Some(Token::False) => {
                self.bump();
                CstExpressionKind::Literal(CstLiteral::Bool(false))
            }
            Some(Token::LParen) => {
                self.bump();
                let inner = self.expression().map(Box::new);
                self.expect(Token::RParen, "')'");
                CstExpressionKind::Parenthesized(inner)
            }
            Some(Token::If) => return self.conditional(),
            Some(Token::Word | Token::This | Token::Var | Token::Local) => {
                let identifier = self.identifier()?;
                let arguments = if self.at(Token::LParen) {
                    Some(self.call_arguments())
                } else {
                    None
                };
                CstExpressionKind::Identifier {
                    identifier,
                    arguments,
                }
            }
            _ => {
                let message = format!("mismatched input {} expecting expression", self.describe_current());
                self.error_here(message);
                return None;
            }
        };
        Some(CstExpression {
            kind,
            span: self.span_from(start),
        })
    }

    fn call_arguments(&mut self) -> Vec<CstExpression> {
        self.bump();
        let mut arguments = Vec::new();
        if self.eat(Token::RParen).is_some() {
            return arguments;
        }
        loop {
            if let Some(argument) = self.expression() {
                arguments.push(argument);
            }
            if self.eat(Token::Comma).is_none() {
                break;
            }
        }
        self.expect(Token::RParen, "')'");
        arguments
    }
}

#[cfg(test)]
mod text_parser_tests {
    use super::*;

    fn parse_ok(source: &str) -> CstProgram {
        let mut log = ProblemLog::new();
        let program = parse_program(source, &mut log);
        assert!(log.is_empty(), "unexpected problems: {:?}", log.problems);
        program
    }

    fn single_block_statements(program: &CstProgram) -> &[CstStatement] {
        match program.elements.last() {
            Some(CstTopLevel::Event(event)) => &event.body.as_ref().expect("event body").statements,
            Some(CstTopLevel::Block(block)) => &block.statements,
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn parses_top_level_declarations() {
        let program = parse_ok(
            "#program \"demo\"\nvar x\nlist items\non FlightStart {\n}\ndef Go(a, b) {\n}\ndef expression Sq(n): n * n\n{\n}\n",
        );
        assert_eq!(program.elements.len(), 7);
        assert!(matches!(
            &program.elements[0],
            CstTopLevel::Directive(CstDirective { name: Some(name), value: Some(value), .. })
                if name == "program" && value == "\"demo\""
        ));
        assert!(matches!(
            &program.elements[2],
            CstTopLevel::VarDeclaration(CstVarDeclaration { is_list: true, .. })
        ));
        let CstTopLevel::Def(def) = &program.elements[4] else {
            panic!("expected def");
        };
        assert_eq!(def.parameters.as_ref().map(|params| params.names.len()), Some(2));
        assert!(matches!(&program.elements[5], CstTopLevel::DefExpression(_)));
        assert!(matches!(&program.elements[6], CstTopLevel::Block(_)));
    }

    #[test]
    fn binary_precedence_nests_multiplication_under_addition() {
        let program = parse_ok("{\nx = 1 + 2 * 3\n}");
        let CstStatement::Assign(assign) = &single_block_statements(&program)[0] else {
            panic!("expected assignment");
        };
        let value = assign.value.as_ref().expect("value");
        let CstExpressionKind::Binary { operator, rhs, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert_eq!(*operator, Token::Plus);
        assert!(matches!(
            rhs.as_deref().map(|rhs| &rhs.kind),
            Some(CstExpressionKind::Binary { operator: Token::Star, .. })
        ));
    }

    #[test]
    fn comment_inside_parentheses_does_not_break_expression() {
        let program = parse_ok("{\nx = (1 + // note\n 2)\n}");
        assert_eq!(single_block_statements(&program).len(), 1);
        assert!(matches!(
            &single_block_statements(&program)[0],
            CstStatement::Assign(assign) if assign.value.is_some()
        ));
    }

    #[test]
    fn exponent_numbers_keep_their_text() {
        let program = parse_ok("{\nx = 1e5\ny = 2E-3\n}");
        let digits = single_block_statements(&program)
            .iter()
            .filter_map(|statement| match statement {
                CstStatement::Assign(assign) => assign.value.as_ref(),
                _ => None,
            })
            .filter_map(|value| match &value.kind {
                CstExpressionKind::Literal(CstLiteral::Number { digits, .. }) => Some(digits.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(digits, vec!["1e5", "2E-3"]);
    }

    #[test]
    fn power_is_right_associative() {
        let program = parse_ok("{\nx = 2 ^ 3 ^ 4\n}");
        let CstStatement::Assign(assign) = &single_block_statements(&program)[0] else {
            panic!("expected assignment");
        };
        let CstExpressionKind::Binary { lhs, rhs, .. } = &assign.value.as_ref().expect("value").kind
        else {
            panic!("expected binary");
        };
        assert!(matches!(
            lhs.as_deref().map(|lhs| &lhs.kind),
            Some(CstExpressionKind::Literal(_))
        ));
        assert!(matches!(
            rhs.as_deref().map(|rhs| &rhs.kind),
            Some(CstExpressionKind::Binary { operator: Token::Caret, .. })
        ));
    }

    #[test]
    fn instruction_argument_list_versus_single_expression() {
        let program = parse_ok("{\nLog.Message(1, 2)\nDisplay (1 + 2) * 3\nActivateStage\n}");
        let statements = single_block_statements(&program);
        let CstStatement::Instruction(list) = &statements[0] else {
            panic!("expected instruction");
        };
        assert!(matches!(&list.arguments, CstArguments::List(args) if args.len() == 2));
        let CstStatement::Instruction(single) = &statements[1] else {
            panic!("expected instruction");
        };
        assert!(matches!(
            &single.arguments,
            CstArguments::Single(CstExpression { kind: CstExpressionKind::Binary { operator: Token::Star, .. }, .. })
        ));
        let CstStatement::Instruction(bare) = &statements[2] else {
            panic!("expected instruction");
        };
        assert_eq!(bare.arguments, CstArguments::None);
    }

    #[test]
    fn else_may_follow_on_a_new_line() {
        let program = parse_ok("{\nif a {\n}\nelse if b then {\n}\nelse {\nbreak\n}\n}");
        let CstStatement::If(statement) = &single_block_statements(&program)[0] else {
            panic!("expected if");
        };
        let Some(CstElse::ElseIf(nested)) = &statement.alternative else {
            panic!("expected else-if");
        };
        assert!(matches!(&nested.alternative, Some(CstElse::Else(block)) if block.statements.len() == 1));
    }

    #[test]
    fn qualified_identifiers_and_keyword_members() {
        let program = parse_ok("{\nthis.\"odd name\" = var.x + local.if\n}");
        let CstStatement::Assign(assign) = &single_block_statements(&program)[0] else {
            panic!("expected assignment");
        };
        let CstAssignTarget::Identifier(target) = &assign.target else {
            panic!("expected identifier target");
        };
        assert_eq!(target.qualifier, Some(CstQualifier::This));
        assert_eq!(target.member, Some(CstMember::Quoted("\"odd name\"".to_string())));
    }

    #[test]
    fn for_wait_and_negative_numbers() {
        let program = parse_ok("{\nfor i = 1 to 10 step -2 {\nwait\nwait 0.5\nwait until x > 3\n}\n}");
        let CstStatement::For(statement) = &single_block_statements(&program)[0] else {
            panic!("expected for");
        };
        assert!(matches!(
            statement.step.as_ref().map(|step| &step.kind),
            Some(CstExpressionKind::Literal(CstLiteral::Number { negative: true, digits })) if digits == "2"
        ));
        let body = &statement.body.as_ref().expect("for body").statements;
        assert!(matches!(&body[0], CstStatement::Wait(CstWait { until: false, condition: None, .. })));
        assert!(matches!(&body[1], CstStatement::Wait(CstWait { until: false, condition: Some(_), .. })));
        assert!(matches!(&body[2], CstStatement::Wait(CstWait { until: true, condition: Some(_), .. })));
    }

    #[test]
    fn comments_inside_blocks_are_statements() {
        let program = parse_ok("// top\n{\n  // inside\n  break // trailing\n}");
        let statements = single_block_statements(&program);
        assert_eq!(statements.len(), 3);
        assert!(matches!(&statements[0], CstStatement::Comment { text, .. } if text == "// inside"));
        assert!(matches!(&statements[2], CstStatement::Comment { .. }));
    }

    #[test]
    fn syntax_errors_are_reported_and_parsing_continues() {
        let mut log = ProblemLog::new();
        let program = parse_program("{\nx = \ny = 2\n}\nvar z", &mut log);
        assert!(log.has_errors());
        assert_eq!(log.problems[0].start.map(|start| start.line), Some(2));
        assert_eq!(program.elements.len(), 2);
        let CstTopLevel::Block(block) = &program.elements[0] else {
            panic!("expected block");
        };
        assert_eq!(block.statements.len(), 2);
        assert!(matches!(&block.statements[0], CstStatement::Assign(CstAssign { value: None, .. })));
    }

    #[test]
    fn missing_closing_brace_is_reported() {
        let mut log = ProblemLog::new();
        parse_program("on FlightStart {\nbreak\n", &mut log);
        assert!(log.problems.iter().any(|problem| problem.message.contains("missing '}'")));
    }
}
