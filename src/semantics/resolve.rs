//! The second pass: resolves every deferred expression reachable from a
//! symbol once the whole scope tree has been built.

use std::mem;

use tracing::debug;

use crate::evaluate::analyzer::ExprAnalyzer;

use super::{
    context::SemanticsContext,
    lazy_expr::LazyExpr,
    scope::ScopeId,
    symbol::{Details, SymbolId},
    types::DeclTypeSpec,
};

/// How many deferred expressions a pass moved out of `Unresolved`, split by
/// outcome. Cells that were already settled are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    pub errors: usize,
}

impl ResolveStats {
    fn record(&mut self, resolved: bool) {
        if resolved {
            self.resolved += 1;
        } else {
            self.errors += 1;
        }
    }
}

pub struct ExprResolver<'a> {
    context: &'a mut SemanticsContext,
    analyzer: &'a mut dyn ExprAnalyzer,
    stats: ResolveStats,
}

impl<'a> ExprResolver<'a> {
    pub fn new(context: &'a mut SemanticsContext, analyzer: &'a mut dyn ExprAnalyzer) -> Self {
        ExprResolver {
            context,
            analyzer,
            stats: ResolveStats::default(),
        }
    }

    /// Walks the tree from the global scope, parents before children.
    pub fn run(mut self) -> ResolveStats {
        let global = self.context.global_scope();
        debug!(scopes = self.context.tree.scope_count(), "resolving deferred expressions");
        self.resolve_scope(global);
        debug!(
            resolved = self.stats.resolved,
            errors = self.stats.errors,
            "finished resolving deferred expressions"
        );
        self.stats
    }

    fn resolve_scope(&mut self, scope: ScopeId) {
        // Symbols in declaration order, so earlier named constants are
        // substitutable in later declarations of the same scope.
        let mut symbols: Vec<SymbolId> = self.context.tree.scope(scope).symbols().map(|(_, id)| id).collect();
        symbols.sort();
        for symbol in symbols {
            self.resolve_symbol(symbol);
        }

        let children = self.context.tree.scope(scope).children().to_vec();
        for child in children {
            self.resolve_scope(child);
        }
    }

    fn resolve_symbol(&mut self, id: SymbolId) {
        let scope = self.context.tree.symbol(id).owner();

        if let Some(DeclTypeSpec::TypeDerived(spec) | DeclTypeSpec::ClassDerived(spec)) =
            self.context.tree.symbol(id).get_type().copied()
        {
            let mut param_values = mem::take(self.context.tree.derived_type_spec_mut(spec).param_values_mut());
            for (_, value) in param_values.iter_mut() {
                if is_pending(value.get_explicit()) {
                    let resolved = value.resolve_explicit(self.context, scope, self.analyzer);
                    self.stats.record(resolved);
                }
            }
            *self.context.tree.derived_type_spec_mut(spec).param_values_mut() = param_values;
        }

        let mut details = mem::take(&mut self.context.tree.symbol_mut(id).details);
        match &mut details {
            Details::ObjectEntity(object) => {
                if let Some(init) = &mut object.init {
                    self.resolve_expr(init, scope);
                }
                for dim in object.shape.iter_mut() {
                    for bound in [&mut dim.lb, &mut dim.ub] {
                        if !is_pending(bound.get_explicit()) {
                            continue;
                        }
                        if let Some(resolved) = bound.resolve(self.context, scope, self.analyzer) {
                            self.stats.record(resolved);
                        }
                    }
                }
            }
            Details::TypeParam(param) => {
                if let Some(init) = &mut param.init {
                    self.resolve_expr(init, scope);
                }
            }
            _ => {}
        }
        self.context.tree.symbol_mut(id).details = details;
    }

    fn resolve_expr(&mut self, expr: &mut LazyExpr, scope: ScopeId) {
        if !expr.is_unresolved() {
            return;
        }
        let resolved = expr.resolve(self.context, scope, self.analyzer);
        self.stats.record(resolved);
    }
}

fn is_pending(expr: Option<&LazyExpr>) -> bool {
    expr.is_some_and(LazyExpr::is_unresolved)
}

/// Resolves the bounds, type parameter values and initializers of every
/// symbol in the tree of `context`.
pub fn resolve_symbol_exprs(context: &mut SemanticsContext, analyzer: &mut dyn ExprAnalyzer) -> ResolveStats {
    ExprResolver::new(context, analyzer).run()
}
