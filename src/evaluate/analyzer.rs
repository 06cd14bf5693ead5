use std::{cmp::Ordering, collections::HashSet};

use lazy_static::lazy_static;

use crate::{
    ast::{
        ast::{self, ExprType},
        expressions::{BinaryOperator, UnaryOperator},
    },
    errors::errors::{Error, ErrorImpl},
    semantics::{
        context::SemanticsContext,
        scope::{ScopeId, ScopeKind},
        symbol::{Attr, Details, SymbolId},
    },
    Name, Position,
};

use super::expr::{Constant, Expr};

lazy_static! {
    static ref INTRINSIC_FUNCTIONS: HashSet<&'static str> = [
        "kind",
        "len",
        "size",
        "max",
        "min",
        "abs",
        "mod",
        "selected_int_kind",
        "int",
        "huge",
    ]
    .into_iter()
    .collect();
}

/// Turns syntax into analyzed expressions and reduces them.
///
/// `analyze` reports its own diagnostics to the context and returns
/// `None` when the expression cannot be given a meaning.
pub trait ExprAnalyzer {
    fn analyze(&mut self, context: &mut SemanticsContext, scope: ScopeId, expr: &ast::Expr) -> Option<Expr>;
    fn fold(&mut self, context: &mut SemanticsContext, expr: Expr) -> Expr;
}

/// Analyzer for specification expressions: constants, named constants,
/// integer arithmetic and a handful of intrinsic inquiries.
#[derive(Debug, Default)]
pub struct DefaultAnalyzer {
    /// Start of the last expression analyzed; where fold warnings point.
    position: Option<Position>,
}

impl DefaultAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    fn warn(&self, context: &mut SemanticsContext, error: ErrorImpl) {
        let position = self.position.clone().unwrap_or_else(Position::null);
        context.say(Error::warning(error, position));
    }

    fn analyze_expr(&mut self, context: &mut SemanticsContext, scope: ScopeId, expr: &ast::Expr) -> Option<Expr> {
        match expr.get_expr_type() {
            ExprType::IntLiteral { value, kind } => {
                let default = context.config.default_integer_kind;
                let kind = kind_param(context, scope, kind.as_deref(), default, expr)?;
                Some(Expr::integer(*value, kind))
            }
            ExprType::RealLiteral { text, kind } => {
                let default = if text.contains(['d', 'D']) {
                    8
                } else {
                    context.config.default_real_kind
                };
                let kind = kind_param(context, scope, kind.as_deref(), default, expr)?;
                Some(Expr::Constant(Constant::Real { text: text.clone(), kind }))
            }
            ExprType::CharLiteral { value } => Some(Expr::Constant(Constant::Character {
                value: value.clone(),
                kind: context.config.default_character_kind,
            })),
            ExprType::LogicalLiteral { value } => Some(Expr::Constant(Constant::Logical {
                value: *value,
                kind: context.config.default_logical_kind,
            })),
            ExprType::Designator { name } => {
                let symbol = match lookup(context, scope, name) {
                    Some(symbol) => symbol,
                    None => {
                        undeclared(context, name);
                        return None;
                    }
                };
                Some(match named_constant(context, symbol) {
                    Some(constant) => Expr::Constant(constant),
                    None => Expr::Designator { name: name.text.clone(), symbol },
                })
            }
            ExprType::Component { base, component } => Some(Expr::Component {
                base: Box::new(self.analyze_expr(context, scope, base)?),
                component: component.text.clone(),
            }),
            ExprType::FunctionRef { callee, args } => {
                let symbol = lookup(context, scope, callee);
                if symbol.is_none() && !INTRINSIC_FUNCTIONS.contains(callee.as_str()) {
                    undeclared(context, callee);
                    return None;
                }

                // Analyze every argument so that each bad one is reported.
                let mut analyzed = Vec::with_capacity(args.len());
                let mut failed = false;
                for arg in args {
                    match self.analyze_expr(context, scope, &arg.value) {
                        Some(value) => analyzed.push((arg.keyword.as_ref().map(|k| k.text.clone()), value)),
                        None => failed = true,
                    }
                }
                if failed {
                    return None;
                }
                Some(Expr::FunctionRef { name: callee.text.clone(), symbol, args: analyzed })
            }
            ExprType::Parentheses(inner) => {
                Some(Expr::Parentheses(Box::new(self.analyze_expr(context, scope, inner)?)))
            }
            ExprType::Unary { operator, operand } => Some(Expr::Unary {
                operator: *operator,
                operand: Box::new(self.analyze_expr(context, scope, operand)?),
            }),
            ExprType::Binary { operator, left, right } => {
                let left = self.analyze_expr(context, scope, left);
                let right = self.analyze_expr(context, scope, right);
                Some(Expr::Binary {
                    operator: *operator,
                    left: Box::new(left?),
                    right: Box::new(right?),
                })
            }
            ExprType::DefinedUnary { operator, .. } | ExprType::DefinedBinary { operator, .. } => {
                context.say(Error::new(
                    ErrorImpl::UnsupportedExpression { what: format!("defined operator {}", operator) },
                    expr.get_span().start.clone(),
                ));
                None
            }
        }
    }

    fn fold_expr(&mut self, context: &mut SemanticsContext, expr: Expr) -> Expr {
        match expr {
            Expr::Parentheses(inner) => match self.fold_expr(context, *inner) {
                Expr::Constant(constant) => Expr::Constant(constant),
                other => Expr::Parentheses(Box::new(other)),
            },
            Expr::Component { base, component } => Expr::Component {
                base: Box::new(self.fold_expr(context, *base)),
                component,
            },
            Expr::FunctionRef { name, symbol, args } => {
                let args: Vec<(Option<String>, Expr)> = args
                    .into_iter()
                    .map(|(keyword, arg)| (keyword, self.fold_expr(context, arg)))
                    .collect();
                if symbol.is_none() {
                    if let Some(constant) = self.fold_intrinsic(context, &name, &args) {
                        return Expr::Constant(constant);
                    }
                }
                Expr::FunctionRef { name, symbol, args }
            }
            Expr::Unary { operator, operand } => {
                let operand = self.fold_expr(context, *operand);
                match self.fold_unary(context, operator, &operand) {
                    Some(constant) => Expr::Constant(constant),
                    None => Expr::Unary { operator, operand: Box::new(operand) },
                }
            }
            Expr::Binary { operator, left, right } => {
                let left = self.fold_expr(context, *left);
                let right = self.fold_expr(context, *right);
                match self.fold_binary(context, operator, &left, &right) {
                    Some(constant) => Expr::Constant(constant),
                    None => Expr::Binary { operator, left: Box::new(left), right: Box::new(right) },
                }
            }
            other => other,
        }
    }

    fn fold_unary(&self, context: &mut SemanticsContext, operator: UnaryOperator, operand: &Expr) -> Option<Constant> {
        match (operator, operand.as_constant()?) {
            (UnaryOperator::Plus, constant @ Constant::Integer { .. }) => Some(constant.clone()),
            (UnaryOperator::Negate, Constant::Integer { value, kind }) => match value.checked_neg() {
                Some(value) => Some(Constant::Integer { value, kind: *kind }),
                None => {
                    self.warn(context, ErrorImpl::IntegerOverflow);
                    None
                }
            },
            (UnaryOperator::Not, Constant::Logical { value, kind }) => {
                Some(Constant::Logical { value: !value, kind: *kind })
            }
            _ => None,
        }
    }

    fn fold_binary(
        &self,
        context: &mut SemanticsContext,
        operator: BinaryOperator,
        left: &Expr,
        right: &Expr,
    ) -> Option<Constant> {
        match (left.as_constant()?, right.as_constant()?) {
            (Constant::Integer { value: a, kind: ka }, Constant::Integer { value: b, kind: kb }) => {
                if let Some(value) = compare(operator, a.cmp(b)) {
                    return Some(Constant::Logical { value, kind: context.config.default_logical_kind });
                }
                let result = match operator {
                    BinaryOperator::Add => a.checked_add(*b).ok_or(ErrorImpl::IntegerOverflow),
                    BinaryOperator::Subtract => a.checked_sub(*b).ok_or(ErrorImpl::IntegerOverflow),
                    BinaryOperator::Multiply => a.checked_mul(*b).ok_or(ErrorImpl::IntegerOverflow),
                    BinaryOperator::Divide if *b == 0 => Err(ErrorImpl::DivisionByZero),
                    BinaryOperator::Divide => a.checked_div(*b).ok_or(ErrorImpl::IntegerOverflow),
                    BinaryOperator::Power => integer_power(*a, *b),
                    _ => return None,
                };
                match result {
                    Ok(value) => Some(Constant::Integer { value, kind: (*ka).max(*kb) }),
                    Err(error) => {
                        self.warn(context, error);
                        None
                    }
                }
            }
            (Constant::Logical { value: a, kind: ka }, Constant::Logical { value: b, kind: kb }) => {
                let value = match operator {
                    BinaryOperator::And => *a && *b,
                    BinaryOperator::Or => *a || *b,
                    BinaryOperator::Eqv => a == b,
                    BinaryOperator::Neqv | BinaryOperator::Xor => a != b,
                    _ => return None,
                };
                Some(Constant::Logical { value, kind: (*ka).max(*kb) })
            }
            (Constant::Character { value: a, kind }, Constant::Character { value: b, .. })
                if operator == BinaryOperator::Concat =>
            {
                Some(Constant::Character { value: format!("{}{}", a, b), kind: *kind })
            }
            _ => None,
        }
    }

    fn fold_intrinsic(&self, context: &mut SemanticsContext, name: &str, args: &[(Option<String>, Expr)]) -> Option<Constant> {
        let values: Vec<&Constant> = args
            .iter()
            .map(|(_, arg)| arg.as_constant())
            .collect::<Option<_>>()?;
        let integers: Option<Vec<i64>> = values.iter().map(|value| value.as_integer()).collect();
        let default_kind = context.config.default_integer_kind;

        match (name, values.as_slice()) {
            ("kind", [value]) => Some(Constant::Integer { value: value.kind() as i64, kind: default_kind }),
            ("len", [Constant::Character { value, .. }]) => Some(Constant::Integer {
                value: value.chars().count() as i64,
                kind: default_kind,
            }),
            ("max" | "min", [_, ..]) => {
                let integers = integers?;
                let value = if name == "max" {
                    integers.iter().max()
                } else {
                    integers.iter().min()
                };
                let kind = values.iter().map(|value| value.kind()).max()?;
                Some(Constant::Integer { value: *value?, kind })
            }
            ("abs", [Constant::Integer { value, kind }]) => match value.checked_abs() {
                Some(value) => Some(Constant::Integer { value, kind: *kind }),
                None => {
                    self.warn(context, ErrorImpl::IntegerOverflow);
                    None
                }
            },
            // Positional arguments only: the keyword order may differ.
            ("mod", [Constant::Integer { value: a, kind }, Constant::Integer { value: p, .. }])
                if args.iter().all(|(keyword, _)| keyword.is_none()) =>
            {
                if *p == 0 {
                    self.warn(context, ErrorImpl::DivisionByZero);
                    return None;
                }
                match a.checked_rem(*p) {
                    Some(value) => Some(Constant::Integer { value, kind: *kind }),
                    None => {
                        self.warn(context, ErrorImpl::IntegerOverflow);
                        None
                    }
                }
            }
            ("selected_int_kind", [Constant::Integer { value, .. }]) => Some(Constant::Integer {
                value: selected_int_kind(*value),
                kind: default_kind,
            }),
            _ => None,
        }
    }
}

impl ExprAnalyzer for DefaultAnalyzer {
    fn analyze(&mut self, context: &mut SemanticsContext, scope: ScopeId, expr: &ast::Expr) -> Option<Expr> {
        self.position = Some(expr.get_span().start.clone());
        self.analyze_expr(context, scope, expr)
    }

    fn fold(&mut self, context: &mut SemanticsContext, expr: Expr) -> Expr {
        self.fold_expr(context, expr)
    }
}

/// Name lookup as seen from `scope`. Inside a derived type definition the
/// type's own parameters come before anything host associated.
fn lookup(context: &mut SemanticsContext, scope: ScopeId, name: &Name) -> Option<SymbolId> {
    if context.tree.scope(scope).kind() == ScopeKind::DerivedType {
        if let Some(symbol) = context.tree.find(scope, name) {
            return Some(symbol);
        }
    }
    context.tree.find_symbol(scope, name)
}

fn undeclared(context: &mut SemanticsContext, name: &Name) {
    context.say(Error::new(
        ErrorImpl::UndeclaredName { name: name.text.clone() },
        name.span.start.clone(),
    ));
}

/// The value of a named constant whose initializer is already folded.
fn named_constant(context: &SemanticsContext, symbol: SymbolId) -> Option<Constant> {
    let symbol = context.tree.symbol(symbol);
    if !symbol.has_attr(Attr::Parameter) {
        return None;
    }
    match &symbol.details {
        Details::ObjectEntity(details) => details.init.as_ref()?.get()?.as_constant().cloned(),
        _ => None,
    }
}

/// The kind of a literal written with an optional `_kind` suffix, which is
/// either digits or the name of an integer constant.
fn kind_param(
    context: &mut SemanticsContext,
    scope: ScopeId,
    suffix: Option<&str>,
    default: i32,
    expr: &ast::Expr,
) -> Option<i32> {
    let suffix = match suffix {
        Some(suffix) => suffix,
        None => return Some(default),
    };

    let kind = if suffix.bytes().all(|b| b.is_ascii_digit()) {
        suffix.parse::<i32>().ok()
    } else {
        let name = Name::new(suffix, expr.get_span().clone());
        lookup(context, scope, &name)
            .and_then(|symbol| named_constant(context, symbol))
            .and_then(|constant| constant.as_integer())
            .and_then(|value| i32::try_from(value).ok())
    };

    match kind {
        Some(kind) if kind > 0 => Some(kind),
        _ => {
            context.say(Error::new(
                ErrorImpl::InvalidKindParameter { kind: suffix.to_string() },
                expr.get_span().start.clone(),
            ));
            None
        }
    }
}

fn compare(operator: BinaryOperator, ordering: Ordering) -> Option<bool> {
    match operator {
        BinaryOperator::Eq => Some(ordering.is_eq()),
        BinaryOperator::Ne => Some(ordering.is_ne()),
        BinaryOperator::Lt => Some(ordering.is_lt()),
        BinaryOperator::Le => Some(ordering.is_le()),
        BinaryOperator::Gt => Some(ordering.is_gt()),
        BinaryOperator::Ge => Some(ordering.is_ge()),
        _ => None,
    }
}

fn integer_power(base: i64, exponent: i64) -> Result<i64, ErrorImpl> {
    let odd = exponent % 2 != 0;
    if exponent < 0 {
        return match base {
            0 => Err(ErrorImpl::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(if odd { -1 } else { 1 }),
            _ => Ok(0),
        };
    }
    match u32::try_from(exponent) {
        Ok(exponent) => base.checked_pow(exponent).ok_or(ErrorImpl::IntegerOverflow),
        Err(_) => match base {
            0 | 1 => Ok(base),
            -1 => Ok(if odd { -1 } else { 1 }),
            _ => Err(ErrorImpl::IntegerOverflow),
        },
    }
}

/// Smallest supported integer kind holding every value in `(-10**r, 10**r)`.
fn selected_int_kind(range: i64) -> i64 {
    match range {
        i64::MIN..=2 => 1,
        3..=4 => 2,
        5..=9 => 4,
        10..=18 => 8,
        _ => -1,
    }
}
