//! Recovered syntax tree for Lexa programs.
//!
//! The parser produces this tree even for malformed input: statements that
//! fail to parse are dropped after their diagnostic is recorded, so later
//! stages can still walk everything that was recognized.

use std::fmt;

use crate::token::TokenKind;

/// Data types a variable can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Double,
    String,
    Char,
    Bool,
    Void,
}

impl DataType {
    /// The data type named by a type-keyword token kind.
    pub fn from_token_kind(kind: TokenKind) -> Option<DataType> {
        match kind {
            TokenKind::TypeInt => Some(DataType::Int),
            TokenKind::TypeFloat => Some(DataType::Float),
            TokenKind::TypeDouble => Some(DataType::Double),
            TokenKind::TypeString => Some(DataType::String),
            TokenKind::TypeChar => Some(DataType::Char),
            TokenKind::TypeBool => Some(DataType::Bool),
            TokenKind::TypeVoid => Some(DataType::Void),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Char => "char",
            DataType::Bool => "bool",
            DataType::Void => "void",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Int,
    Float,
    String,
    Char,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
        }
    }
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Expression node with the position of its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal, String),
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    /// `first op rhs op rhs ...` at one precedence level, associating left.
    /// Kept flat so long chains never nest.
    Binary(Box<Expr>, Vec<BinaryStep>),
}

/// One `op rhs` link of a [`ExprKind::Binary`] chain, positioned at the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryStep {
    pub op: BinaryOp,
    pub rhs: Expr,
    pub line: usize,
    pub col: usize,
}

/// `{ ... }` with the position of its opening brace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub line: usize,
    pub col: usize,
}

/// Statement node with the position of its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `<type> <name> [= <init>];`
    Declaration {
        ty: DataType,
        name: String,
        init: Option<Expr>,
    },
    /// `<target> = <value>;`
    Assign { target: String, value: Expr },
    /// `x++;`, `--x;` and friends. `op` is one of the increment/decrement ops.
    Step { target: String, op: UnaryOp },
    /// `if` plus every `else if`, in order, as `(condition, block)` pairs.
    If {
        branches: Vec<(Expr, Block)>,
        else_block: Option<Block>,
    },
    While { cond: Expr, body: Block },
    DoWhile { body: Block, cond: Expr },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Box<Stmt>>,
        body: Block,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    Block(Block),
}

/// The single `int main() { ... }` function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Line of the `main` keyword, when one was found.
    pub main_line: Option<usize>,
    /// Body of `main`; absent when no block could be located.
    pub body: Option<Block>,
}
