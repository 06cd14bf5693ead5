use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    /// Dotted spellings with a fixed meaning. Any other `.name.` is a
    /// user-defined operator.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert(".true.", TokenKind::Logical);
        map.insert(".false.", TokenKind::Logical);
        map.insert(".and.", TokenKind::And);
        map.insert(".or.", TokenKind::Or);
        map.insert(".not.", TokenKind::Not);
        map.insert(".eqv.", TokenKind::Eqv);
        map.insert(".neqv.", TokenKind::Neqv);
        map.insert(".xor.", TokenKind::Xor);
        map.insert(".eq.", TokenKind::Equals);
        map.insert(".ne.", TokenKind::NotEquals);
        map.insert(".lt.", TokenKind::Less);
        map.insert(".le.", TokenKind::LessEquals);
        map.insert(".gt.", TokenKind::Greater);
        map.insert(".ge.", TokenKind::GreaterEquals);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Real,
    String,
    Logical,
    Identifier,
    DefinedOperator,

    OpenParen,
    CloseParen,
    Comma,
    Assignment, // =
    Percent,

    Equals,    // == .EQ.
    NotEquals, // /= .NE.
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    And,
    Or,
    Not,
    Eqv,
    Neqv,
    Xor,

    Plus,
    Dash,
    Star,
    Slash,
    Power,  // **
    Concat, // //
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Integer
            | TokenKind::Real
            | TokenKind::String
            | TokenKind::Logical
            | TokenKind::Identifier
            | TokenKind::DefinedOperator => write!(f, "{} ({})", self.kind, self.value),
            _ => write!(f, "{}", self.kind),
        }
    }
}
