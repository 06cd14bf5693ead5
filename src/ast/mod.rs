/// AST (Abstract Syntax Tree) module
/// Contains the syntax expression nodes deferred expressions are built from
///
/// Submodules:
/// - ast: The expression node and its kinds
/// - expressions: Operators and actual arguments
pub mod ast;
pub mod expressions;
