use std::fmt::Debug;

use crate::{Name, Span};

use super::expressions::{ActualArg, BinaryOperator, UnaryOperator};

/// Expression Types
///
/// Defines the various kinds of syntax expressions. Literal values are kept
/// as written; giving them meaning is the analyzer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprType {
    IntLiteral {
        value: i64,
        kind: Option<String>,
    },
    RealLiteral {
        text: String,
        kind: Option<String>,
    },
    CharLiteral {
        value: String,
    },
    LogicalLiteral {
        value: bool,
    },
    Designator {
        name: Name,
    },
    /// `base%component`
    Component {
        base: Box<Expr>,
        component: Name,
    },
    /// A function reference or an array element; the two are not
    /// distinguishable syntactically.
    FunctionRef {
        callee: Name,
        args: Vec<ActualArg>,
    },
    Parentheses(Box<Expr>),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    DefinedUnary {
        operator: String,
        operand: Box<Expr>,
    },
    DefinedBinary {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A syntax expression node together with the source it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub expr_type: ExprType,
    pub span: Span,
}

impl Expr {
    pub fn new(expr_type: ExprType, span: Span) -> Self {
        Expr { expr_type, span }
    }

    /// Returns the expression type of the expression.
    pub fn get_expr_type(&self) -> &ExprType {
        &self.expr_type
    }

    /// Returns the span of the expression.
    pub fn get_span(&self) -> &Span {
        &self.span
    }
}
