//! Parser module for building syntax expressions.
//!
//! This module contains the parser that transforms a stream of tokens
//! into an expression tree. It uses a Pratt parser with Fortran operator
//! precedence and handles:
//!
//! - Intrinsic and user-defined unary and binary operators
//! - Function references and array elements with keyword arguments
//! - Component references and parenthesized expressions
//! - Error reporting with source positions
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;

#[cfg(test)]
mod tests;
