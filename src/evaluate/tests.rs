//! Unit tests for expression analysis and folding.
//!
//! This module contains tests for:
//! - Folding of integer, logical and character constants
//! - Named constant substitution and symbol binding
//! - Kind parameters on literals
//! - Intrinsic function folding
//! - Diagnostics for undeclared names, defined operators and bad arithmetic
//! - Rendering with precedence-aware parentheses

use std::rc::Rc;

use crate::{
    ast::expressions::{BinaryOperator, UnaryOperator},
    errors::errors::Severity,
    parser::parser::parse_expr_source,
    semantics::{
        context::SemanticsContext,
        lazy_expr::LazyExpr,
        scope::{ScopeId, ScopeKind},
        symbol::{Attr, Details, ModuleDetails, ObjectEntityDetails, SymbolId},
        types::{DeclTypeSpec, IntrinsicTypeSpec, TypeCategory},
    },
    Name, Span,
};

use super::{
    analyzer::{DefaultAnalyzer, ExprAnalyzer},
    expr::{Constant, Expr},
};

fn name(text: &str) -> Name {
    let file = Rc::new(String::from("test.f90"));
    Name::new(text, Span::new(0, text.len() as u32, &file))
}

fn integer_entity(init: Option<LazyExpr>) -> Details {
    Details::ObjectEntity(ObjectEntityDetails {
        ty: Some(DeclTypeSpec::Intrinsic(IntrinsicTypeSpec::new(TypeCategory::Integer, 4))),
        init,
        ..Default::default()
    })
}

/// A context with one module scope to analyze in.
fn setup() -> (SemanticsContext, ScopeId) {
    let mut context = SemanticsContext::default();
    let global = context.global_scope();
    let module_symbol = context
        .tree
        .declare(global, &name("m"), Details::Module(ModuleDetails::default()))
        .unwrap();
    let module = context.tree.make_scope(global, ScopeKind::Module, Some(module_symbol));
    (context, module)
}

fn declare_constant(context: &mut SemanticsContext, scope: ScopeId, text: &str, value: i64) -> SymbolId {
    let id = context
        .tree
        .declare(scope, &name(text), integer_entity(Some(LazyExpr::from(Expr::integer(value, 4)))))
        .unwrap();
    context.tree.symbol_mut(id).attrs.insert(Attr::Parameter);
    id
}

fn declare_variable(context: &mut SemanticsContext, scope: ScopeId, text: &str) -> SymbolId {
    context.tree.declare(scope, &name(text), integer_entity(None)).unwrap()
}

fn analyze(context: &mut SemanticsContext, scope: ScopeId, source: &str) -> Option<Expr> {
    let syntax = parse_expr_source(source, "test.f90").unwrap();
    let mut analyzer = DefaultAnalyzer::new();
    let expr = analyzer.analyze(context, scope, &syntax)?;
    Some(analyzer.fold(context, expr))
}

fn fold_to_string(source: &str) -> String {
    let (mut context, module) = setup();
    analyze(&mut context, module, source).unwrap().to_string()
}

#[test]
fn test_fold_integer_arithmetic() {
    let (mut context, module) = setup();
    let expr = analyze(&mut context, module, "2 + 3 * 4").unwrap();
    assert_eq!(expr, Expr::integer(14, 4));
    assert_eq!(expr.to_string(), "14");

    assert_eq!(fold_to_string("(10 - 4) / 4"), "1");
    assert_eq!(fold_to_string("2 ** 3 ** 2"), "512");
    assert_eq!(fold_to_string("-7 + 2"), "-5");
    assert_eq!(fold_to_string("2 ** (-1)"), "0");
    assert!(context.messages.is_empty());
}

#[test]
fn test_literal_kinds() {
    let (mut context, module) = setup();
    assert_eq!(analyze(&mut context, module, "42_8").unwrap(), Expr::integer(42, 8));
    assert_eq!(
        analyze(&mut context, module, "1.5").unwrap(),
        Expr::Constant(Constant::Real { text: "1.5".to_string(), kind: 4 })
    );
    assert_eq!(
        analyze(&mut context, module, "1d0").unwrap(),
        Expr::Constant(Constant::Real { text: "1d0".to_string(), kind: 8 })
    );
    assert_eq!(
        analyze(&mut context, module, ".true.").unwrap(),
        Expr::Constant(Constant::Logical { value: true, kind: 4 })
    );
}

#[test]
fn test_kind_suffix_named_constant() {
    let (mut context, module) = setup();
    declare_constant(&mut context, module, "ik", 8);

    assert_eq!(analyze(&mut context, module, "7_ik").unwrap(), Expr::integer(7, 8));
    assert!(context.messages.is_empty());
}

#[test]
fn test_invalid_kind_suffix() {
    let (mut context, module) = setup();
    declare_variable(&mut context, module, "v");

    assert_eq!(analyze(&mut context, module, "7_zz"), None);
    assert_eq!(analyze(&mut context, module, "7_v"), None);
    assert_eq!(analyze(&mut context, module, "7_0"), None);

    let names: Vec<&str> = context.messages.iter().map(|m| m.get_error_name()).collect();
    assert_eq!(names, vec!["InvalidKindParameter"; 3]);
}

#[test]
fn test_named_constant_is_substituted() {
    let (mut context, module) = setup();
    declare_constant(&mut context, module, "n", 10);

    let expr = analyze(&mut context, module, "n * 2").unwrap();
    assert_eq!(expr, Expr::integer(20, 4));
}

#[test]
fn test_variable_is_bound_to_symbol() {
    let (mut context, module) = setup();
    let m = declare_variable(&mut context, module, "count");

    let expr = analyze(&mut context, module, "Count + 1").unwrap();
    match &expr {
        Expr::Binary { operator, left, .. } => {
            assert_eq!(*operator, BinaryOperator::Add);
            assert_eq!(**left, Expr::Designator { name: "count".to_string(), symbol: m });
        }
        other => panic!("expected binary, got {:?}", other),
    }
    assert_eq!(expr.to_string(), "count+1");
    assert_eq!(context.tree.symbol(m).occurrences().len(), 1);
}

#[test]
fn test_host_associated_name() {
    let (mut context, module) = setup();
    declare_constant(&mut context, module, "n", 3);
    let sub = context.tree.declare(module, &name("s"), Details::Subprogram(Default::default())).unwrap();
    let subprogram = context.tree.make_scope(module, ScopeKind::Subprogram, Some(sub));

    assert_eq!(analyze(&mut context, subprogram, "n + n").unwrap(), Expr::integer(6, 4));
}

#[test]
fn test_undeclared_name() {
    let (mut context, module) = setup();
    assert_eq!(analyze(&mut context, module, "1 + nope"), None);

    assert_eq!(context.messages.len(), 1);
    let message = context.messages.iter().next().unwrap();
    assert_eq!(message.get_error_name(), "UndeclaredName");
    assert_eq!(message.get_position().0, 4);
    assert!(context.messages.has_errors());
}

#[test]
fn test_every_bad_argument_is_reported() {
    let (mut context, module) = setup();
    assert_eq!(analyze(&mut context, module, "max(a, 1, b)"), None);
    assert_eq!(context.messages.len(), 2);
}

#[test]
fn test_defined_operator_is_unsupported() {
    let (mut context, module) = setup();
    assert_eq!(analyze(&mut context, module, "1 .plus. 2"), None);

    let message = context.messages.iter().next().unwrap();
    assert_eq!(message.get_error_name(), "UnsupportedExpression");
}

#[test]
fn test_division_by_zero_is_left_unfolded() {
    let (mut context, module) = setup();
    let expr = analyze(&mut context, module, "1 / 0").unwrap();
    assert_eq!(expr.to_string(), "1/0");

    let message = context.messages.iter().next().unwrap();
    assert_eq!(message.get_error_name(), "DivisionByZero");
    assert_eq!(message.get_severity(), Severity::Warning);
    assert!(!context.messages.has_errors());
}

#[test]
fn test_integer_overflow_is_left_unfolded() {
    let (mut context, module) = setup();
    let expr = analyze(&mut context, module, "9223372036854775807 + 1").unwrap();
    assert!(matches!(expr, Expr::Binary { operator: BinaryOperator::Add, .. }));

    let message = context.messages.iter().next().unwrap();
    assert_eq!(message.get_error_name(), "IntegerOverflow");
}

#[test]
fn test_fold_logical_and_relational() {
    assert_eq!(fold_to_string(".not. .true. .or. 1 < 2"), ".TRUE.");
    assert_eq!(fold_to_string("3 >= 4"), ".FALSE.");
    assert_eq!(fold_to_string(".true. .neqv. .true."), ".FALSE.");
}

#[test]
fn test_fold_concatenation() {
    assert_eq!(fold_to_string("'ab' // \"c'd\""), "'abc''d'");
}

#[test]
fn test_fold_intrinsics() {
    assert_eq!(fold_to_string("max(3, 7, 2)"), "7");
    assert_eq!(fold_to_string("min(3, -7)"), "-7");
    assert_eq!(fold_to_string("mod(10, 3)"), "1");
    assert_eq!(fold_to_string("abs(-5)"), "5");
    assert_eq!(fold_to_string("kind(1_8)"), "8");
    assert_eq!(fold_to_string("len('abc')"), "3");
    assert_eq!(fold_to_string("selected_int_kind(9)"), "4");
    assert_eq!(fold_to_string("selected_int_kind(r=2)"), "1");
    assert_eq!(fold_to_string("selected_int_kind(40)"), "-1");
}

#[test]
fn test_intrinsic_on_variable_is_kept() {
    let (mut context, module) = setup();
    declare_variable(&mut context, module, "a");

    let expr = analyze(&mut context, module, "size(a) + 1").unwrap();
    assert_eq!(expr.to_string(), "size(a)+1");
    match expr {
        Expr::Binary { left, .. } => {
            assert!(matches!(*left, Expr::FunctionRef { symbol: None, .. }));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_variable_is_kept() {
    let (mut context, module) = setup();
    declare_variable(&mut context, module, "a");

    let expr = analyze(&mut context, module, "(a + (2 * 3))").unwrap();
    assert_eq!(expr.to_string(), "(a+6)");
}

#[test]
fn test_render_precedence() {
    let (mut context, module) = setup();
    let ids: Vec<SymbolId> = ["a", "b", "c"]
        .iter()
        .map(|text| declare_variable(&mut context, module, text))
        .collect();
    let var = |i: usize| {
        Box::new(Expr::Designator { name: ["a", "b", "c"][i].to_string(), symbol: ids[i] })
    };
    let binary = |operator, left, right| Box::new(Expr::Binary { operator, left, right });

    let sum_times = Expr::Binary {
        operator: BinaryOperator::Multiply,
        left: binary(BinaryOperator::Add, var(0), var(1)),
        right: var(2),
    };
    assert_eq!(sum_times.to_string(), "(a+b)*c");

    let nested_difference = Expr::Binary {
        operator: BinaryOperator::Subtract,
        left: var(0),
        right: binary(BinaryOperator::Subtract, var(1), var(2)),
    };
    assert_eq!(nested_difference.to_string(), "a-(b-c)");

    let right_power = Expr::Binary {
        operator: BinaryOperator::Power,
        left: var(0),
        right: binary(BinaryOperator::Power, var(1), var(2)),
    };
    assert_eq!(right_power.to_string(), "a**b**c");

    let left_power = Expr::Binary {
        operator: BinaryOperator::Power,
        left: binary(BinaryOperator::Power, var(0), var(1)),
        right: var(2),
    };
    assert_eq!(left_power.to_string(), "(a**b)**c");

    let negated_sum = Expr::Unary {
        operator: UnaryOperator::Negate,
        operand: binary(BinaryOperator::Add, var(0), var(1)),
    };
    assert_eq!(negated_sum.to_string(), "-(a+b)");

    let not_and = Expr::Unary {
        operator: UnaryOperator::Not,
        operand: binary(BinaryOperator::And, var(0), var(1)),
    };
    assert_eq!(not_and.to_string(), ".NOT.(a.AND.b)");
}

#[test]
fn test_render_function_reference() {
    let (mut context, module) = setup();
    declare_variable(&mut context, module, "m");

    let expr = analyze(&mut context, module, "selected_int_kind(r=m)").unwrap();
    assert_eq!(expr.to_string(), "selected_int_kind(r=m)");
}
