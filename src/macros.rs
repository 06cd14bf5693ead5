//! Utility macros for the analyzer.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//! - `CHECK!` - Asserts an internal invariant of the analyzer
//!
//! The first two reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for simple single-token patterns.
///
/// Generates a handler function that creates a token with the given kind
/// and advances the lexer position by the token's length.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let span = lexer.span_of($value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}

/// Checks an internal invariant of the analyzer.
///
/// A failure is a defect in the analyzer, never a property of the program
/// being compiled, so it aborts instead of producing a diagnostic.
///
/// # Example
///
/// ```ignore
/// CHECK!(scope.kind() == ScopeKind::DerivedType);
/// CHECK!(kind > 0, "bad kind {}", kind);
/// ```
#[macro_export]
macro_rules! CHECK {
    ($cond:expr) => {
        if !$cond {
            panic!(
                "CHECK({}) failed at {}:{}",
                stringify!($cond),
                file!(),
                line!()
            );
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            panic!(
                "CHECK({}) failed at {}:{}: {}",
                stringify!($cond),
                file!(),
                line!(),
                format!($($arg)+)
            );
        }
    };
}
