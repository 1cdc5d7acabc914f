//! Abstract syntax tree for the C subset.
//!
//! The parser produces owned vectors rather than sibling-linked lists, and
//! stamps every expression and declaration with a [`NodeId`]. The type
//! checker keys its annotation tables (inferred types, symbol bindings) on
//! those ids, so the tree itself stays immutable after parsing.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Identity of an AST node within one compilation.
///
/// Ids are dense and allocated in parse order, which makes them usable as
/// indices into side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// A source-level type specifier, before semantic resolution.
///
/// Const-ness and array-ness live on [`Decl`]; a specifier is just the base
/// type name. Struct specifiers are resolved nominally by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeSpec {
    Int,
    Char,
    Float,
    Void,
    Struct(String),
}

/// Array part of a declarator: `x[5]`, `x[]` or plain `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayLen {
    /// `x[]`: size resolved from the initializer, or defaulted.
    Unspecified,
    /// `x[n]`
    Fixed(u32),
}

/// A whole translation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level item: global declaration, function definition or struct
/// definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Decl(Decl),
    Function(Function),
    Struct(StructDef),
}

/// Variable declaration (global, local, parameter or struct member).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    pub id: NodeId,
    pub name: String,
    pub spec: TypeSpec,
    pub is_const: bool,
    pub array: Option<ArrayLen>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Function definition: `int f(int a, char b) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: NodeId,
    pub name: String,
    pub return_spec: TypeSpec,
    pub params: Vec<Decl>,
    pub body: Block,
    pub span: Span,
}

/// Struct definition: `struct Point { int x; int y; };`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub id: NodeId,
    pub name: String,
    pub members: Vec<Decl>,
    pub span: Span,
}

/// Braced statement sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Decl(Decl),
    Struct(StructDef),
    Expr {
        expr: Expr,
        span: Span,
    },
    Block(Block),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
        span: Span,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    /// A stray `;`.
    Empty {
        span: Span,
    },
}

/// Binary operators (arithmetic, bitwise, shift, comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }

    /// Mod, bitwise and shift operators: integral operands only.
    pub fn is_integral_only(&self) -> bool {
        matches!(
            self,
            BinOp::Mod | BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr
        )
    }
}

/// Assignment operators: `=` and the nine compound forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl AssignOp {
    /// The arithmetic operator a compound assignment expands to.
    pub fn binop(&self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
            AssignOp::BitAnd => Some(BinOp::BitAnd),
            AssignOp::BitOr => Some(BinOp::BitOr),
            AssignOp::BitXor => Some(BinOp::BitXor),
            AssignOp::Shl => Some(BinOp::Shl),
            AssignOp::Shr => Some(BinOp::Shr),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Neg,
    LogicalNot,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
    Addr,
    Deref,
}

impl UnaryOp {
    pub fn is_inc_dec(&self) -> bool {
        matches!(
            self,
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
        )
    }
}

/// Logical connectives with short-circuit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// Expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    IntLit {
        id: NodeId,
        value: i64,
        span: Span,
    },
    FloatLit {
        id: NodeId,
        value: f32,
        span: Span,
    },
    CharLit {
        id: NodeId,
        value: u8,
        span: Span,
    },
    StrLit {
        id: NodeId,
        value: String,
        span: Span,
    },
    BoolLit {
        id: NodeId,
        value: bool,
        span: Span,
    },
    Ident {
        id: NodeId,
        name: String,
        span: Span,
    },
    Binary {
        id: NodeId,
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    Logical {
        id: NodeId,
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    Assign {
        id: NodeId,
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    Ternary {
        id: NodeId,
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: Span,
    },
    Unary {
        id: NodeId,
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Cast {
        id: NodeId,
        spec: TypeSpec,
        operand: Box<Expr>,
        span: Span,
    },
    Call {
        id: NodeId,
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Index {
        id: NodeId,
        array: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Member {
        id: NodeId,
        object: Box<Expr>,
        field: String,
        span: Span,
    },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Self::IntLit { id, .. } => *id,
            Self::FloatLit { id, .. } => *id,
            Self::CharLit { id, .. } => *id,
            Self::StrLit { id, .. } => *id,
            Self::BoolLit { id, .. } => *id,
            Self::Ident { id, .. } => *id,
            Self::Binary { id, .. } => *id,
            Self::Logical { id, .. } => *id,
            Self::Assign { id, .. } => *id,
            Self::Ternary { id, .. } => *id,
            Self::Unary { id, .. } => *id,
            Self::Cast { id, .. } => *id,
            Self::Call { id, .. } => *id,
            Self::Index { id, .. } => *id,
            Self::Member { id, .. } => *id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::IntLit { span, .. } => *span,
            Self::FloatLit { span, .. } => *span,
            Self::CharLit { span, .. } => *span,
            Self::StrLit { span, .. } => *span,
            Self::BoolLit { span, .. } => *span,
            Self::Ident { span, .. } => *span,
            Self::Binary { span, .. } => *span,
            Self::Logical { span, .. } => *span,
            Self::Assign { span, .. } => *span,
            Self::Ternary { span, .. } => *span,
            Self::Unary { span, .. } => *span,
            Self::Cast { span, .. } => *span,
            Self::Call { span, .. } => *span,
            Self::Index { span, .. } => *span,
            Self::Member { span, .. } => *span,
        }
    }
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Self::Decl(decl) => decl.span,
            Self::Struct(def) => def.span,
            Self::Expr { span, .. } => *span,
            Self::Block(block) => block.span,
            Self::If { span, .. } => *span,
            Self::While { span, .. } => *span,
            Self::DoWhile { span, .. } => *span,
            Self::For { span, .. } => *span,
            Self::Return { span, .. } => *span,
            Self::Break { span } => *span,
            Self::Continue { span } => *span,
            Self::Empty { span } => *span,
        }
    }
}
