use crate::{lexer::tokens::TokenKind, Name};

use super::ast::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Dash => Some(UnaryOperator::Negate),
            TokenKind::Not => Some(UnaryOperator::Not),
            _ => None,
        }
    }

    pub fn spelling(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => ".NOT.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Power,
    Multiply,
    Divide,
    Add,
    Subtract,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Eqv,
    Neqv,
    Xor,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Power => Some(BinaryOperator::Power),
            TokenKind::Star => Some(BinaryOperator::Multiply),
            TokenKind::Slash => Some(BinaryOperator::Divide),
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Dash => Some(BinaryOperator::Subtract),
            TokenKind::Concat => Some(BinaryOperator::Concat),
            TokenKind::Equals => Some(BinaryOperator::Eq),
            TokenKind::NotEquals => Some(BinaryOperator::Ne),
            TokenKind::Less => Some(BinaryOperator::Lt),
            TokenKind::LessEquals => Some(BinaryOperator::Le),
            TokenKind::Greater => Some(BinaryOperator::Gt),
            TokenKind::GreaterEquals => Some(BinaryOperator::Ge),
            TokenKind::And => Some(BinaryOperator::And),
            TokenKind::Or => Some(BinaryOperator::Or),
            TokenKind::Eqv => Some(BinaryOperator::Eqv),
            TokenKind::Neqv => Some(BinaryOperator::Neqv),
            TokenKind::Xor => Some(BinaryOperator::Xor),
            _ => None,
        }
    }

    pub fn spelling(self) -> &'static str {
        match self {
            BinaryOperator::Power => "**",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Concat => "//",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "/=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => ".AND.",
            BinaryOperator::Or => ".OR.",
            BinaryOperator::Eqv => ".EQV.",
            BinaryOperator::Neqv => ".NEQV.",
            BinaryOperator::Xor => ".XOR.",
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Lt
                | BinaryOperator::Le
                | BinaryOperator::Gt
                | BinaryOperator::Ge
        )
    }
}

/// An actual argument, optionally introduced by `keyword=`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualArg {
    pub keyword: Option<Name>,
    pub value: Expr,
}
