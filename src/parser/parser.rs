//! Token cursor and entry points for parsing specification expressions.

use std::collections::HashMap;

use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::{Token, TokenKind}},
};

use super::{
    expr::parse_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
    },
};

/// Cursor over one expression's tokens plus the Pratt dispatch tables.
///
/// The token stream always ends in `EOF`; the cursor parks on it.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    prefix: NUDLookup,
    infix: LEDLookup,
    powers: BPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut parser = Parser {
            tokens,
            cursor: 0,
            prefix: HashMap::new(),
            infix: HashMap::new(),
            powers: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        parser
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.tokens.len().saturating_sub(1))
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.clamp(self.cursor)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens[self.clamp(self.cursor + n)].kind
    }

    /// Moves past the current token and hands it back.
    pub fn advance(&mut self) -> &Token {
        let index = self.clamp(self.cursor);
        if self.tokens[index].kind != TokenKind::EOF {
            self.cursor += 1;
        }
        &self.tokens[index]
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() == kind {
            return Ok(self.advance().clone());
        }
        Err(unexpected_here(self))
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.prefix
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.infix
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.powers
    }

    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: LEDHandler) {
        self.powers.insert(kind, binding_power);
        self.infix.insert(kind, handler);
    }

    pub fn nud(&mut self, kind: TokenKind, handler: NUDHandler) {
        self.prefix.insert(kind, handler);
    }
}

fn unexpected_here(parser: &Parser) -> Error {
    let token = parser.current_token();
    Error::new(
        ErrorImpl::UnexpectedToken { token: token.value.clone() },
        token.span.start.clone(),
    )
}

/// Parses a token stream that must hold exactly one expression.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, Error> {
    let mut parser = Parser::new(tokens);
    let expr = parse_expr(&mut parser, BindingPower::Default)?;
    if parser.current_token_kind() != TokenKind::EOF {
        return Err(unexpected_here(&parser));
    }
    Ok(expr)
}

pub fn parse_expr_source(source: &str, file: &str) -> Result<Expr, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    parse(tokens)
}
