#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

pub mod ast;
pub mod errors;
pub mod evaluate;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantics;

extern crate regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

/// Half-open interval `[start, end)` of offsets in one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: u32, end: u32, file: &Rc<String>) -> Self {
        Span {
            start: Position(start, Rc::clone(file)),
            end: Position(end, Rc::clone(file)),
        }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.1 == other.start.1
            && self.start.0 <= other.start.0
            && other.end.0 <= self.end.0
    }

    /// Grows this span so that it also covers `other`. Never shrinks.
    pub fn extend_to_cover(&mut self, other: &Span) {
        if other.start.0 < self.start.0 {
            self.start.0 = other.start.0;
        }
        if other.end.0 > self.end.0 {
            self.end.0 = other.end.0;
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.start.1, self.start.0, self.end.0)
    }
}

/// A name as it appears in the source: the case-folded text plus the span
/// it was written at. Lookups key on the text; the span is what gets
/// recorded as a symbol occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub text: String,
    pub span: Span,
}

impl Name {
    pub fn new(text: &str, span: Span) -> Self {
        Name {
            text: text.to_ascii_lowercase(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
