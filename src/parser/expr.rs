use crate::{ast::{ast::{Expr, ExprType}, expressions::{ActualArg, BinaryOperator, UnaryOperator}}, errors::errors::{Error, ErrorImpl}, lexer::tokens::{Token, TokenKind}, Name, Span};

use super::{lookups::BindingPower, parser::Parser};

fn unexpected(token: &Token) -> Error {
    Error::new(ErrorImpl::UnexpectedToken { token: token.value.clone() }, token.span.start.clone())
}

fn span_between(start: &Span, end: &Span) -> Span {
    Span { start: start.start.clone(), end: end.end.clone() }
}

/// Splits `digits_kind` literal text into the value part and the kind part.
fn split_kind(text: &str) -> (&str, Option<String>) {
    match text.split_once('_') {
        Some((value, kind)) => (value, Some(kind.to_string())),
        None => (text, None),
    }
}

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(handler) => *handler,
        None => return Err(unexpected(parser.current_token())),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(handler) => *handler,
            None => return Err(unexpected(parser.current_token())),
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let expr_type = match token.kind {
        TokenKind::Integer => {
            let (digits, kind) = split_kind(&token.value);
            match digits.parse::<i64>() {
                Ok(value) => ExprType::IntLiteral { value, kind },
                Err(_) => {
                    return Err(Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone()));
                }
            }
        },
        TokenKind::Real => {
            let (text, kind) = split_kind(&token.value);
            ExprType::RealLiteral { text: text.to_string(), kind }
        },
        TokenKind::String => ExprType::CharLiteral { value: token.value.clone() },
        TokenKind::Logical => ExprType::LogicalLiteral { value: token.value == ".true." },
        TokenKind::Identifier => ExprType::Designator { name: Name::new(&token.value, token.span.clone()) },
        _ => return Err(unexpected(&token)),
    };

    Ok(Expr::new(expr_type, token.span))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match BinaryOperator::from_token_kind(operator_token.kind) {
        Some(operator) => operator,
        None => return Err(unexpected(&operator_token)),
    };

    let right = parse_expr(parser, bp)?;
    let span = span_between(left.get_span(), right.get_span());

    Ok(Expr::new(ExprType::Binary { operator, left: Box::new(left), right: Box::new(right) }, span))
}

/// `**` groups right to left, so the right operand may itself contain `**`.
pub fn parse_power_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let right = parse_expr(parser, BindingPower::Multiplicative)?;
    let span = span_between(left.get_span(), right.get_span());

    Ok(Expr::new(
        ExprType::Binary { operator: BinaryOperator::Power, left: Box::new(left), right: Box::new(right) },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let (operator, operand_bp) = match operator_token.kind {
        TokenKind::Not => (UnaryOperator::Not, BindingPower::Not),
        kind => match UnaryOperator::from_token_kind(kind) {
            Some(operator) => (operator, BindingPower::Additive),
            None => return Err(unexpected(&operator_token)),
        },
    };

    let operand = parse_expr(parser, operand_bp)?;
    let span = span_between(&operator_token.span, operand.get_span());

    Ok(Expr::new(ExprType::Unary { operator, operand: Box::new(operand) }, span))
}

pub fn parse_defined_unary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::DefinedUnary)?;
    let span = span_between(&operator_token.span, operand.get_span());

    Ok(Expr::new(
        ExprType::DefinedUnary { operator: operator_token.value, operand: Box::new(operand) },
        span,
    ))
}

pub fn parse_defined_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, bp)?;
    let span = span_between(left.get_span(), right.get_span());

    Ok(Expr::new(
        ExprType::DefinedBinary { operator: operator_token.value, left: Box::new(left), right: Box::new(right) },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let expr = parse_expr(parser, BindingPower::Default)?;
    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(ExprType::Parentheses(Box::new(expr)), span_between(&open.span, &close.span)))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let callee = match left.get_expr_type() {
        ExprType::Designator { name } => name.clone(),
        _ => return Err(unexpected(parser.current_token())),
    };
    parser.advance();

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let keyword = if parser.current_token_kind() == TokenKind::Identifier && parser.peek_kind(1) == TokenKind::Assignment {
            let token = parser.advance().clone();
            parser.advance();
            Some(Name::new(&token.value, token.span))
        } else {
            None
        };

        let value = parse_expr(parser, BindingPower::Default)?;
        args.push(ActualArg { keyword, value });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(unexpected(parser.current_token()));
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(ExprType::FunctionRef { callee, args }, span_between(left.get_span(), &close.span)))
}

pub fn parse_component_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let component = parser.expect(TokenKind::Identifier)?;
    let span = span_between(left.get_span(), &component.span);

    Ok(Expr::new(
        ExprType::Component { base: Box::new(left), component: Name::new(&component.value, component.span) },
        span,
    ))
}
