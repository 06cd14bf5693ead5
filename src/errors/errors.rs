use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    severity: Severity,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            severity: Severity::Error,
        }
    }

    pub fn warning(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            severity: Severity::Warning,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SymbolAlreadyDeclared { .. } => "SymbolAlreadyDeclared",
            ErrorImpl::ImportNoneNotSole => "ImportNoneNotSole",
            ErrorImpl::ImportAllNotSole => "ImportAllNotSole",
            ErrorImpl::ImportOnlyMismatch => "ImportOnlyMismatch",
            ErrorImpl::UndeclaredName { .. } => "UndeclaredName",
            ErrorImpl::UnsupportedExpression { .. } => "UnsupportedExpression",
            ErrorImpl::InvalidKindParameter { .. } => "InvalidKindParameter",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::IntegerOverflow => "IntegerOverflow",
        }
    }

    /// The Fortran constraint this diagnostic enforces, if any.
    pub fn get_rule(&self) -> Option<&'static str> {
        self.internal_error.rule()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SymbolAlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::ImportNoneNotSole | ErrorImpl::ImportAllNotSole => ErrorTip::Suggestion(
                String::from("Remove the other IMPORT statements from this scope"),
            ),
            ErrorImpl::ImportOnlyMismatch => ErrorTip::Suggestion(String::from(
                "Add the ONLY specifier to every IMPORT statement in this scope",
            )),
            ErrorImpl::UndeclaredName { name } => {
                ErrorTip::Suggestion(format!("`{}` is not visible in this scope", name))
            }
            ErrorImpl::UnsupportedExpression { .. } => ErrorTip::None,
            ErrorImpl::InvalidKindParameter { kind } => ErrorTip::Suggestion(format!(
                "Kind parameter `{}` must be a positive integer constant",
                kind
            )),
            ErrorImpl::DivisionByZero | ErrorImpl::IntegerOverflow => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", severity, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("{name:?} is already declared in this scope")]
    SymbolAlreadyDeclared { name: String },
    #[error("IMPORT,NONE must be the only IMPORT statement in a scope")]
    ImportNoneNotSole,
    #[error("IMPORT,ALL must be the only IMPORT statement in a scope")]
    ImportAllNotSole,
    #[error("Every IMPORT must have ONLY specifier if one of them does")]
    ImportOnlyMismatch,
    #[error("no explicit type declared for {name:?}")]
    UndeclaredName { name: String },
    #[error("{what} is not supported in this context")]
    UnsupportedExpression { what: String },
    #[error("invalid kind parameter {kind:?}")]
    InvalidKindParameter { kind: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
}

impl ErrorImpl {
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            ErrorImpl::ImportNoneNotSole | ErrorImpl::ImportAllNotSole => Some("C898"),
            ErrorImpl::ImportOnlyMismatch => Some("C8100"),
            _ => None,
        }
    }
}

/// Diagnostic sink. Messages are collected in emission order; rendering
/// them is the driver's business.
#[derive(Debug, Default)]
pub struct Messages {
    messages: Vec<Error>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, error: Error) {
        self.messages.push(error);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|message| message.get_severity() == Severity::Error)
    }
}
