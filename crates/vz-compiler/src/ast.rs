use vz_core::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    Value,
    List,
}

/// Resolved classification of an expression identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Unknown,
    Invalid,
    Builtin,
    /// Call to a user-declared expression.
    Expression,
    Global,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Unknown,
    Invalid,
    Builtin,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOperator {
    Set,
    Change,
}

impl AssignOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "=",
            Self::Change => "+=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitType {
    Seconds,
    Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralType {
    Number,
    String,
    Bool,
    Vector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Error(ErrorNode),
    Program(ProgramNode),
    VariableDeclaration(VariableDeclarationNode),
    InstructionDeclaration(InstructionDeclarationNode),
    ExpressionDeclaration(ExpressionDeclarationNode),
    Event(EventNode),
    Detached(DetachedNode),
    Instruction(InstructionNode),
    Assignment(AssignmentNode),
    Comment(CommentNode),
    Wait(WaitNode),
    If(IfNode),
    While(WhileNode),
    For(ForNode),
    Break(BreakNode),
    Repeat(RepeatNode),
    Identifier(IdentifierNode),
    Literal(LiteralNode),
    BinaryOp(BinaryOpNode),
    UnaryOp(UnaryOpNode),
    Conditional(ConditionalNode),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorNode {
    pub message: Option<String>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramNode {
    pub name: String,
    pub globals: Vec<VariableDeclarationNode>,
    pub body: Vec<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarationNode {
    pub identifier: String,
    pub identifier_loc: Option<SourceSpan>,
    pub variable_type: VariableType,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionDeclarationNode {
    pub pos: Option<String>,
    pub identifier: String,
    pub identifier_loc: Option<SourceSpan>,
    /// Author-supplied format template, `_` marking each parameter.
    pub call_format: Option<String>,
    pub parameters: Vec<String>,
    pub body: Vec<AstNode>,
    pub locals: Option<Vec<String>>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionDeclarationNode {
    pub pos: Option<String>,
    pub identifier: String,
    pub identifier_loc: Option<SourceSpan>,
    pub call_format: Option<String>,
    pub parameters: Vec<String>,
    pub expression: Box<AstNode>,
    pub locals: Option<Vec<String>>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub pos: Option<String>,
    pub event: String,
    /// Message filter of a `ReceiveMessage` handler.
    pub event_filter: Option<String>,
    pub parameters: Vec<String>,
    pub parameters_loc: Option<SourceSpan>,
    pub body: Vec<AstNode>,
    pub locals: Option<Vec<String>>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetachedNode {
    pub pos: Option<String>,
    pub body: Vec<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionNode {
    pub identifier: String,
    pub identifier_loc: Option<SourceSpan>,
    pub arguments: Vec<AstNode>,
    pub kind: InstructionKind,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub target: Box<AstNode>,
    pub operator: AssignOperator,
    pub value: Box<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: String,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaitNode {
    pub wait_type: WaitType,
    pub condition: Box<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub condition: Box<AstNode>,
    pub consequent: Vec<AstNode>,
    /// Empty when there is no `else`; a single `If` is an `else if` rung.
    pub alternative: Vec<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileNode {
    pub condition: Box<AstNode>,
    pub body: Vec<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub var: String,
    pub start: Box<AstNode>,
    pub end: Box<AstNode>,
    pub step: Box<AstNode>,
    pub body: Vec<AstNode>,
    pub locals: Option<Vec<String>>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakNode {
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatNode {
    pub count: Box<AstNode>,
    pub body: Vec<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierNode {
    pub identifier: String,
    pub kind: IdentifierKind,
    pub identifier_loc: Option<SourceSpan>,
    /// Empty when the identifier is not called.
    pub arguments: Vec<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub value_type: LiteralType,
    pub value: String,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpNode {
    /// Canonical symbol: `+ - * / % ^ = g ge l le and or`.
    pub op: String,
    pub lhs: Box<AstNode>,
    pub rhs: Box<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOpNode {
    pub op: String,
    pub operand: Box<AstNode>,
    pub loc: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalNode {
    pub condition: Box<AstNode>,
    pub consequent: Box<AstNode>,
    pub alternative: Box<AstNode>,
    pub loc: Option<SourceSpan>,
}

impl AstNode {
    pub fn error() -> Self {
        Self::Error(ErrorNode::default())
    }

    pub fn error_with_message(message: impl Into<String>) -> Self {
        Self::Error(ErrorNode {
            message: Some(message.into()),
            loc: None,
        })
    }

    pub fn literal(value_type: LiteralType, value: impl Into<String>) -> Self {
        Self::Literal(LiteralNode {
            value_type,
            value: value.into(),
            loc: None,
        })
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self::literal(LiteralType::Number, value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(LiteralType::String, value)
    }

    pub fn identifier(
        identifier: impl Into<String>,
        kind: IdentifierKind,
        arguments: Vec<AstNode>,
    ) -> Self {
        Self::Identifier(IdentifierNode {
            identifier: identifier.into(),
            kind,
            identifier_loc: None,
            arguments,
            loc: None,
        })
    }

    pub fn instruction(
        identifier: impl Into<String>,
        kind: InstructionKind,
        arguments: Vec<AstNode>,
    ) -> Self {
        Self::Instruction(InstructionNode {
            identifier: identifier.into(),
            identifier_loc: None,
            arguments,
            kind,
            loc: None,
        })
    }

    pub fn binary(op: impl Into<String>, lhs: AstNode, rhs: AstNode) -> Self {
        Self::BinaryOp(BinaryOpNode {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            loc: None,
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Error(_) => "Error",
            Self::Program(_) => "Program",
            Self::VariableDeclaration(_) => "VariableDeclaration",
            Self::InstructionDeclaration(_) => "InstructionDeclaration",
            Self::ExpressionDeclaration(_) => "ExpressionDeclaration",
            Self::Event(_) => "Event",
            Self::Detached(_) => "Detached",
            Self::Instruction(_) => "Instruction",
            Self::Assignment(_) => "Assignment",
            Self::Comment(_) => "Comment",
            Self::Wait(_) => "Wait",
            Self::If(_) => "If",
            Self::While(_) => "While",
            Self::For(_) => "For",
            Self::Break(_) => "Break",
            Self::Repeat(_) => "Repeat",
            Self::Identifier(_) => "Identifier",
            Self::Literal(_) => "Literal",
            Self::BinaryOp(_) => "BinaryOp",
            Self::UnaryOp(_) => "UnaryOp",
            Self::Conditional(_) => "Conditional",
        }
    }

    pub fn loc(&self) -> Option<SourceSpan> {
        match self {
            Self::Error(node) => node.loc,
            Self::Program(node) => node.loc,
            Self::VariableDeclaration(node) => node.loc,
            Self::InstructionDeclaration(node) => node.loc,
            Self::ExpressionDeclaration(node) => node.loc,
            Self::Event(node) => node.loc,
            Self::Detached(node) => node.loc,
            Self::Instruction(node) => node.loc,
            Self::Assignment(node) => node.loc,
            Self::Comment(node) => node.loc,
            Self::Wait(node) => node.loc,
            Self::If(node) => node.loc,
            Self::While(node) => node.loc,
            Self::For(node) => node.loc,
            Self::Break(node) => node.loc,
            Self::Repeat(node) => node.loc,
            Self::Identifier(node) => node.loc,
            Self::Literal(node) => node.loc,
            Self::BinaryOp(node) => node.loc,
            Self::UnaryOp(node) => node.loc,
            Self::Conditional(node) => node.loc,
        }
    }

    /// True when an `Error` placeholder appears anywhere in the tree.
    pub fn contains_error(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| found |= matches!(node, AstNode::Error(_)));
        found
    }

    /// Pre-order traversal over this node and all of its descendants.
    pub fn walk(&self, f: &mut dyn FnMut(&AstNode)) {
        fn walk_all(nodes: &[AstNode], f: &mut dyn FnMut(&AstNode)) {
            for node in nodes {
                node.walk(f);
            }
        }

        f(self);
        match self {
            Self::Error(_)
            | Self::VariableDeclaration(_)
            | Self::Comment(_)
            | Self::Break(_)
            | Self::Literal(_) => {}
            Self::Program(node) => walk_all(&node.body, f),
            Self::InstructionDeclaration(node) => walk_all(&node.body, f),
            Self::ExpressionDeclaration(node) => node.expression.walk(f),
            Self::Event(node) => walk_all(&node.body, f),
            Self::Detached(node) => walk_all(&node.body, f),
            Self::Instruction(node) => walk_all(&node.arguments, f),
            Self::Assignment(node) => {
                node.target.walk(f);
                node.value.walk(f);
            }
            Self::Wait(node) => node.condition.walk(f),
            Self::If(node) => {
                node.condition.walk(f);
                walk_all(&node.consequent, f);
                walk_all(&node.alternative, f);
            }
            Self::While(node) => {
                node.condition.walk(f);
                walk_all(&node.body, f);
            }
            Self::For(node) => {
                node.start.walk(f);
                node.end.walk(f);
                node.step.walk(f);
                walk_all(&node.body, f);
            }
            Self::Repeat(node) => {
                node.count.walk(f);
                walk_all(&node.body, f);
            }
            Self::Identifier(node) => walk_all(&node.arguments, f),
            Self::BinaryOp(node) => {
                node.lhs.walk(f);
                node.rhs.walk(f);
            }
            Self::UnaryOp(node) => node.operand.walk(f),
            Self::Conditional(node) => {
                node.condition.walk(f);
                node.consequent.walk(f);
                node.alternative.walk(f);
            }
        }
    }

    /// Drops source ranges and computed `locals` throughout the tree so two
    /// trees can be compared structurally.
    pub fn clear_metadata(&mut self) {
        fn clear_all(nodes: &mut [AstNode]) {
            for node in nodes {
                node.clear_metadata();
            }
        }

        match self {
            Self::Error(node) => node.loc = None,
            Self::Program(node) => {
                node.loc = None;
                for global in &mut node.globals {
                    global.loc = None;
                    global.identifier_loc = None;
                }
                clear_all(&mut node.body);
            }
            Self::VariableDeclaration(node) => {
                node.loc = None;
                node.identifier_loc = None;
            }
            Self::InstructionDeclaration(node) => {
                node.loc = None;
                node.identifier_loc = None;
                node.locals = None;
                clear_all(&mut node.body);
            }
            Self::ExpressionDeclaration(node) => {
                node.loc = None;
                node.identifier_loc = None;
                node.locals = None;
                node.expression.clear_metadata();
            }
            Self::Event(node) => {
                node.loc = None;
                node.parameters_loc = None;
                node.locals = None;
                clear_all(&mut node.body);
            }
            Self::Detached(node) => {
                node.loc = None;
                clear_all(&mut node.body);
            }
            Self::Instruction(node) => {
                node.loc = None;
                node.identifier_loc = None;
                clear_all(&mut node.arguments);
            }
            Self::Assignment(node) => {
                node.loc = None;
                node.target.clear_metadata();
                node.value.clear_metadata();
            }
            Self::Comment(node) => node.loc = None,
            Self::Wait(node) => {
                node.loc = None;
                node.condition.clear_metadata();
            }
            Self::If(node) => {
                node.loc = None;
                node.condition.clear_metadata();
                clear_all(&mut node.consequent);
                clear_all(&mut node.alternative);
            }
            Self::While(node) => {
                node.loc = None;
                node.condition.clear_metadata();
                clear_all(&mut node.body);
            }
            Self::For(node) => {
                node.loc = None;
                node.locals = None;
                node.start.clear_metadata();
                node.end.clear_metadata();
                node.step.clear_metadata();
                clear_all(&mut node.body);
            }
            Self::Break(node) => node.loc = None,
            Self::Repeat(node) => {
                node.loc = None;
                node.count.clear_metadata();
                clear_all(&mut node.body);
            }
            Self::Identifier(node) => {
                node.loc = None;
                node.identifier_loc = None;
                clear_all(&mut node.arguments);
            }
            Self::Literal(node) => node.loc = None,
            Self::BinaryOp(node) => {
                node.loc = None;
                node.lhs.clear_metadata();
                node.rhs.clear_metadata();
            }
            Self::UnaryOp(node) => {
                node.loc = None;
                node.operand.clear_metadata();
            }
            Self::Conditional(node) => {
                node.loc = None;
                node.condition.clear_metadata();
                node.consequent.clear_metadata();
                node.alternative.clear_metadata();
            }
        }
    }
}
