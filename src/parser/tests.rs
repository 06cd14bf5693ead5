//! Unit tests for the parser module.
//!
//! This module contains tests for parsing expressions including:
//! - Literals and designators
//! - Operator precedence and associativity
//! - Function references with keyword arguments
//! - Component references
//! - Error cases

use crate::ast::{ast::ExprType, expressions::{BinaryOperator, UnaryOperator}};
use super::parser::parse_expr_source;

fn parse(source: &str) -> ExprType {
    parse_expr_source(source, "test.f90").unwrap().expr_type
}

#[test]
fn test_parse_integer_literal() {
    assert_eq!(parse("42"), ExprType::IntLiteral { value: 42, kind: None });
    assert_eq!(
        parse("42_8"),
        ExprType::IntLiteral { value: 42, kind: Some("8".to_string()) }
    );
}

#[test]
fn test_parse_literals() {
    assert_eq!(
        parse("1.5e3_dp"),
        ExprType::RealLiteral { text: "1.5e3".to_string(), kind: Some("dp".to_string()) }
    );
    assert_eq!(parse("'abc'"), ExprType::CharLiteral { value: "abc".to_string() });
    assert_eq!(parse(".FALSE."), ExprType::LogicalLiteral { value: false });
}

#[test]
fn test_parse_designator() {
    match parse("Nx") {
        ExprType::Designator { name } => {
            assert_eq!(name.as_str(), "nx");
            assert_eq!((name.span.start.0, name.span.end.0), (0, 2));
        }
        other => panic!("expected designator, got {:?}", other),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    match parse("1 + 2 * 3") {
        ExprType::Binary { operator, right, .. } => {
            assert_eq!(operator, BinaryOperator::Add);
            assert!(matches!(
                right.expr_type,
                ExprType::Binary { operator: BinaryOperator::Multiply, .. }
            ));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_subtraction_is_left_associative() {
    match parse("10 - 4 - 3") {
        ExprType::Binary { operator, left, right } => {
            assert_eq!(operator, BinaryOperator::Subtract);
            assert!(matches!(
                left.expr_type,
                ExprType::Binary { operator: BinaryOperator::Subtract, .. }
            ));
            assert_eq!(right.expr_type, ExprType::IntLiteral { value: 3, kind: None });
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_power_is_right_associative() {
    match parse("2 ** 3 ** 2") {
        ExprType::Binary { operator, left, right } => {
            assert_eq!(operator, BinaryOperator::Power);
            assert_eq!(left.expr_type, ExprType::IntLiteral { value: 2, kind: None });
            assert!(matches!(
                right.expr_type,
                ExprType::Binary { operator: BinaryOperator::Power, .. }
            ));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_unary_minus_applies_to_power() {
    match parse("-a**2") {
        ExprType::Unary { operator, operand } => {
            assert_eq!(operator, UnaryOperator::Negate);
            assert!(matches!(
                operand.expr_type,
                ExprType::Binary { operator: BinaryOperator::Power, .. }
            ));
        }
        other => panic!("expected unary, got {:?}", other),
    }
}

#[test]
fn test_unary_minus_stops_at_addition() {
    match parse("-a + b") {
        ExprType::Binary { operator, left, .. } => {
            assert_eq!(operator, BinaryOperator::Add);
            assert!(matches!(left.expr_type, ExprType::Unary { operator: UnaryOperator::Negate, .. }));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_logical_precedence() {
    match parse(".not. a .and. b .or. c < d") {
        ExprType::Binary { operator, left, right } => {
            assert_eq!(operator, BinaryOperator::Or);
            assert!(matches!(left.expr_type, ExprType::Binary { operator: BinaryOperator::And, .. }));
            assert!(matches!(right.expr_type, ExprType::Binary { operator: BinaryOperator::Lt, .. }));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parse_function_reference_with_keyword() {
    match parse("selected_int_kind(r=9)") {
        ExprType::FunctionRef { callee, args } => {
            assert_eq!(callee.as_str(), "selected_int_kind");
            assert_eq!(args.len(), 1);
            assert_eq!(args[0].keyword.as_ref().map(|k| k.as_str()), Some("r"));
            assert_eq!(args[0].value.expr_type, ExprType::IntLiteral { value: 9, kind: None });
        }
        other => panic!("expected function reference, got {:?}", other),
    }
}

#[test]
fn test_parse_function_reference_arguments() {
    match parse("max(n, 2*m, 3)") {
        ExprType::FunctionRef { args, .. } => {
            assert_eq!(args.len(), 3);
            assert!(args.iter().all(|arg| arg.keyword.is_none()));
        }
        other => panic!("expected function reference, got {:?}", other),
    }
}

#[test]
fn test_parse_component_reference() {
    match parse("x%k + 1") {
        ExprType::Binary { left, .. } => match left.expr_type {
            ExprType::Component { component, .. } => assert_eq!(component.as_str(), "k"),
            other => panic!("expected component, got {:?}", other),
        },
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parentheses_are_preserved() {
    match parse("(n + 1) * 2") {
        ExprType::Binary { operator, left, .. } => {
            assert_eq!(operator, BinaryOperator::Multiply);
            assert!(matches!(left.expr_type, ExprType::Parentheses(_)));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parse_defined_operators() {
    assert!(matches!(parse(".inv. a"), ExprType::DefinedUnary { .. }));
    match parse("a .cross. b + c") {
        ExprType::DefinedBinary { operator, right, .. } => {
            assert_eq!(operator, ".cross.");
            assert!(matches!(right.expr_type, ExprType::Binary { operator: BinaryOperator::Add, .. }));
        }
        other => panic!("expected defined binary, got {:?}", other),
    }
}

#[test]
fn test_expression_span() {
    let expr = parse_expr_source("  n * 2", "test.f90").unwrap();
    assert_eq!((expr.span.start.0, expr.span.end.0), (2, 7));
}

#[test]
fn test_unbalanced_parentheses() {
    let error = parse_expr_source("(n + 1", "test.f90").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_trailing_tokens() {
    let error = parse_expr_source("n m", "test.f90").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 2);
}

#[test]
fn test_integer_literal_too_large() {
    let error = parse_expr_source("99999999999999999999", "test.f90").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}
