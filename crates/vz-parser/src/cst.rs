//! Concrete syntax tree produced by [`crate::parse_program`].
//!
//! Children that may be absent after error recovery are `Option`s; string
//! tokens keep their quotes and escapes so the consumer decides how to
//! un-escape them.

use vz_core::SourceSpan;

use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CstProgram {
    pub elements: Vec<CstTopLevel>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstTopLevel {
    Directive(CstDirective),
    VarDeclaration(CstVarDeclaration),
    Event(CstEvent),
    Def(CstDef),
    DefExpression(CstDefExpression),
    Block(CstBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstDirective {
    pub name: Option<String>,
    /// Raw string token, quotes included.
    pub value: Option<String>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstNameKind {
    /// Dotted words, joined with `.`.
    Word(String),
    /// Raw string token, quotes included.
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstDeclName {
    pub kind: CstNameKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstParameters {
    pub names: Vec<CstDeclName>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstVarDeclaration {
    pub is_list: bool,
    pub name: Option<CstDeclName>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstEventName {
    Word(String),
    /// Raw string token naming a message filter.
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstEvent {
    pub name: Option<CstEventName>,
    pub parameters: Option<CstParameters>,
    pub body: Option<CstBlock>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstDef {
    pub name: Option<CstDeclName>,
    pub parameters: Option<CstParameters>,
    pub body: Option<CstBlock>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstDefExpression {
    pub name: Option<CstDeclName>,
    pub parameters: Option<CstParameters>,
    pub value: Option<CstExpression>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstBlock {
    pub statements: Vec<CstStatement>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstStatement {
    /// Raw comment token starting with `//`.
    Comment { text: String, span: SourceSpan },
    If(CstIf),
    While(CstLoop),
    Repeat(CstLoop),
    For(CstFor),
    Break { span: SourceSpan },
    Wait(CstWait),
    Assign(CstAssign),
    Instruction(CstInstruction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstIf {
    pub condition: Option<CstExpression>,
    pub consequent: Option<CstBlock>,
    pub alternative: Option<CstElse>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstElse {
    ElseIf(Box<CstIf>),
    Else(CstBlock),
}

/// `while COND { }` and `repeat COUNT { }`.
#[derive(Debug, Clone, PartialEq)]
pub struct CstLoop {
    pub head: Option<CstExpression>,
    pub body: Option<CstBlock>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstFor {
    pub var: Option<CstDeclName>,
    pub start: Option<CstExpression>,
    pub end: Option<CstExpression>,
    pub step: Option<CstExpression>,
    pub body: Option<CstBlock>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstWait {
    pub until: bool,
    pub condition: Option<CstExpression>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstAssignTarget {
    Identifier(CstIdentifier),
    Parenthesized(Option<CstExpression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstAssign {
    pub target: CstAssignTarget,
    /// `Token::Assign` or `Token::PlusAssign`.
    pub operator: Token,
    pub value: Option<CstExpression>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstArguments {
    None,
    List(Vec<CstExpression>),
    Single(CstExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstInstruction {
    pub identifier: CstIdentifier,
    pub arguments: CstArguments,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CstQualifier {
    This,
    Var,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstMember {
    /// Dotted words, joined with `.`.
    Word(String),
    /// Raw string token, quotes included.
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstIdentifier {
    pub qualifier: Option<CstQualifier>,
    pub member: Option<CstMember>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstExpression {
    pub kind: CstExpressionKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstLiteral {
    /// Digits as written; `negative` records a leading `-`.
    Number { negative: bool, digits: String },
    /// Raw string token, quotes included.
    String(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstExpressionKind {
    Literal(CstLiteral),
    Identifier {
        identifier: CstIdentifier,
        /// `None` when there is no call suffix.
        arguments: Option<Vec<CstExpression>>,
    },
    Parenthesized(Option<Box<CstExpression>>),
    Binary {
        operator: Token,
        lhs: Option<Box<CstExpression>>,
        rhs: Option<Box<CstExpression>>,
    },
    Not(Option<Box<CstExpression>>),
    Conditional {
        condition: Option<Box<CstExpression>>,
        consequent: Option<Box<CstExpression>>,
        alternative: Option<Box<CstExpression>>,
    },
}
