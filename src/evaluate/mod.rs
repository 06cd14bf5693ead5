//! Analyzed expressions and the collaborator that produces them.
//!
//! Deferred expressions in the semantic model hold syntax until the
//! resolver pass hands them to an `ExprAnalyzer`, which binds names to
//! symbols (`analyze`) and reduces constant subexpressions (`fold`).

pub mod analyzer;
pub mod expr;

#[cfg(test)]
mod tests;
