//! Expressions whose analysis is deferred until every declaration has
//! been processed, and the bound and type parameter values built on them.

use std::{fmt::Display, rc::Rc};

use tracing::debug;

use crate::{
    ast::ast,
    evaluate::{
        analyzer::ExprAnalyzer,
        expr::{Constant, Expr},
    },
    CHECK,
};

use super::{context::SemanticsContext, scope::ScopeId};

/// Kind of the integer constants that `Bound::from` produces.
pub const SUBSCRIPT_INTEGER_KIND: i32 = 8;

/// A deferred expression.
///
/// Starts out holding the syntax it was declared with and moves, at most
/// once, to either `Resolved` or `Error`. An `Unresolved(None)` holds no
/// expression at all and resolves straight to `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum LazyExpr {
    Unresolved(Option<Rc<ast::Expr>>),
    Error,
    Resolved(Box<Expr>),
}

impl Default for LazyExpr {
    fn default() -> Self {
        LazyExpr::Unresolved(None)
    }
}

impl LazyExpr {
    pub fn new(syntax: Rc<ast::Expr>) -> Self {
        LazyExpr::Unresolved(Some(syntax))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LazyExpr::Resolved(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LazyExpr::Error)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, LazyExpr::Unresolved(_))
    }

    pub fn get(&self) -> Option<&Expr> {
        match self {
            LazyExpr::Resolved(expr) => Some(expr),
            _ => None,
        }
    }

    /// Analyzes and folds the held syntax in `scope`.
    ///
    /// Returns whether the expression is resolved afterwards. Calling this
    /// on an expression that already left `Unresolved` changes nothing.
    pub fn resolve(
        &mut self,
        context: &mut SemanticsContext,
        scope: ScopeId,
        analyzer: &mut dyn ExprAnalyzer,
    ) -> bool {
        let syntax = match self {
            LazyExpr::Resolved(_) => return true,
            LazyExpr::Error => return false,
            LazyExpr::Unresolved(syntax) => syntax.take(),
        };

        *self = match syntax {
            None => {
                debug!("nothing to resolve in an empty expression");
                LazyExpr::Error
            }
            Some(syntax) => match analyzer.analyze(context, scope, &syntax) {
                Some(expr) => LazyExpr::Resolved(Box::new(analyzer.fold(context, expr))),
                None => {
                    debug!(span = %syntax.span, "expression did not analyze");
                    LazyExpr::Error
                }
            },
        };

        self.is_resolved()
    }
}

impl From<Expr> for LazyExpr {
    fn from(expr: Expr) -> Self {
        LazyExpr::Resolved(Box::new(expr))
    }
}

impl Display for LazyExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LazyExpr::Unresolved(None) => write!(f, "EMPTY"),
            LazyExpr::Unresolved(Some(_)) => write!(f, "UNRESOLVED"),
            LazyExpr::Error => write!(f, "ERROR"),
            LazyExpr::Resolved(expr) => write!(f, "{}", expr),
        }
    }
}

/// One bound of an array dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// `*`
    Assumed,
    /// `:`
    Deferred,
    Explicit(LazyExpr),
}

impl Bound {
    pub fn explicit(syntax: Rc<ast::Expr>) -> Self {
        Bound::Explicit(LazyExpr::new(syntax))
    }

    pub fn is_assumed(&self) -> bool {
        matches!(self, Bound::Assumed)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Bound::Deferred)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Bound::Explicit(_))
    }

    pub fn get_explicit(&self) -> Option<&LazyExpr> {
        match self {
            Bound::Explicit(expr) => Some(expr),
            _ => None,
        }
    }

    /// Resolves an explicit bound. Assumed and deferred bounds hold nothing
    /// to resolve and are left alone.
    pub fn resolve(
        &mut self,
        context: &mut SemanticsContext,
        scope: ScopeId,
        analyzer: &mut dyn ExprAnalyzer,
    ) -> Option<bool> {
        match self {
            Bound::Explicit(expr) => Some(expr.resolve(context, scope, analyzer)),
            _ => None,
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Explicit(LazyExpr::from(Expr::Constant(Constant::Integer {
            value,
            kind: SUBSCRIPT_INTEGER_KIND,
        })))
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Assumed => write!(f, "*"),
            Bound::Deferred => write!(f, ":"),
            Bound::Explicit(expr) => write!(f, "{}", expr),
        }
    }
}

/// A value supplied for a derived type parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Assumed,
    Deferred,
    Explicit(LazyExpr),
}

impl ParamValue {
    pub fn explicit(syntax: Rc<ast::Expr>) -> Self {
        ParamValue::Explicit(LazyExpr::new(syntax))
    }

    pub fn is_assumed(&self) -> bool {
        matches!(self, ParamValue::Assumed)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ParamValue::Deferred)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, ParamValue::Explicit(_))
    }

    pub fn get_explicit(&self) -> Option<&LazyExpr> {
        match self {
            ParamValue::Explicit(expr) => Some(expr),
            _ => None,
        }
    }

    /// Resolves the value. Only explicit values carry an expression.
    pub fn resolve_explicit(
        &mut self,
        context: &mut SemanticsContext,
        scope: ScopeId,
        analyzer: &mut dyn ExprAnalyzer,
    ) -> bool {
        CHECK!(self.is_explicit());
        match self {
            ParamValue::Explicit(expr) => expr.resolve(context, scope, analyzer),
            _ => false,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Assumed => write!(f, "*"),
            ParamValue::Deferred => write!(f, ":"),
            ParamValue::Explicit(expr) => write!(f, "{}", expr),
        }
    }
}

/// Lower and upper bound of one array dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub lb: Bound,
    pub ub: Bound,
}

impl ShapeSpec {
    pub fn explicit(lb: Bound, ub: Bound) -> Self {
        ShapeSpec { lb, ub }
    }

    /// `(:)`
    pub fn deferred() -> Self {
        ShapeSpec {
            lb: Bound::Deferred,
            ub: Bound::Deferred,
        }
    }

    /// `(lb:)` of an assumed-shape dummy argument.
    pub fn assumed_shape(lb: Bound) -> Self {
        ShapeSpec {
            lb,
            ub: Bound::Deferred,
        }
    }

    /// `(lb:*)`
    pub fn assumed_size(lb: Bound) -> Self {
        ShapeSpec {
            lb,
            ub: Bound::Assumed,
        }
    }

    /// `(..)`
    pub fn assumed_rank() -> Self {
        ShapeSpec {
            lb: Bound::Assumed,
            ub: Bound::Assumed,
        }
    }
}

impl Display for ShapeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lb.is_assumed() {
            CHECK!(self.ub.is_assumed());
            return write!(f, "..");
        }
        if !self.lb.is_deferred() {
            write!(f, "{}", self.lb)?;
        }
        write!(f, ":")?;
        if !self.ub.is_deferred() {
            write!(f, "{}", self.ub)?;
        }
        Ok(())
    }
}
