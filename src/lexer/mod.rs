//! Lexical analysis for Fortran expression text.
//!
//! This module contains the lexer (tokenizer) that converts the text of a
//! specification expression into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of names, literals, dotted and symbolic operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
