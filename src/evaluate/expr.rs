use std::fmt::Display;

use crate::{
    ast::expressions::{BinaryOperator, UnaryOperator},
    semantics::symbol::SymbolId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Integer { value: i64, kind: i32 },
    /// Reals are not folded, so the literal text is kept as written.
    Real { text: String, kind: i32 },
    Logical { value: bool, kind: i32 },
    Character { value: String, kind: i32 },
}

impl Constant {
    pub fn kind(&self) -> i32 {
        match self {
            Constant::Integer { kind, .. }
            | Constant::Real { kind, .. }
            | Constant::Logical { kind, .. }
            | Constant::Character { kind, .. } => *kind,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Constant::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Integer { value, .. } => write!(f, "{}", value),
            Constant::Real { text, .. } => write!(f, "{}", text),
            Constant::Logical { value: true, .. } => write!(f, ".TRUE."),
            Constant::Logical { value: false, .. } => write!(f, ".FALSE."),
            Constant::Character { value, .. } => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

/// An analyzed expression: names are bound to symbols and literals carry
/// their kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Constant),
    Designator {
        name: String,
        symbol: SymbolId,
    },
    Component {
        base: Box<Expr>,
        component: String,
    },
    /// `symbol` is absent for intrinsic functions.
    FunctionRef {
        name: String,
        symbol: Option<SymbolId>,
        args: Vec<(Option<String>, Expr)>,
    },
    Parentheses(Box<Expr>),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn integer(value: i64, kind: i32) -> Self {
        Expr::Constant(Constant::Integer { value, kind })
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Expr::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.as_constant().and_then(Constant::as_integer)
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Constant(Constant::Integer { value, .. }) if *value < 0 => {
                unary_precedence(UnaryOperator::Negate)
            }
            Expr::Unary { operator, .. } => unary_precedence(*operator),
            Expr::Binary { operator, .. } => binary_precedence(*operator),
            _ => PRIMARY,
        }
    }
}

const PRIMARY: u8 = 10;

fn unary_precedence(operator: UnaryOperator) -> u8 {
    match operator {
        UnaryOperator::Not => 4,
        UnaryOperator::Plus | UnaryOperator::Negate => 7,
    }
}

fn binary_precedence(operator: BinaryOperator) -> u8 {
    match operator {
        BinaryOperator::Eqv | BinaryOperator::Neqv | BinaryOperator::Xor => 1,
        BinaryOperator::Or => 2,
        BinaryOperator::And => 3,
        BinaryOperator::Eq
        | BinaryOperator::Ne
        | BinaryOperator::Lt
        | BinaryOperator::Le
        | BinaryOperator::Gt
        | BinaryOperator::Ge => 5,
        BinaryOperator::Concat => 6,
        BinaryOperator::Add | BinaryOperator::Subtract => 7,
        BinaryOperator::Multiply | BinaryOperator::Divide => 8,
        BinaryOperator::Power => 9,
    }
}

fn write_operand(f: &mut std::fmt::Formatter<'_>, operand: &Expr, parenthesize: bool) -> std::fmt::Result {
    if parenthesize {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Constant(constant) => write!(f, "{}", constant),
            Expr::Designator { name, .. } => write!(f, "{}", name),
            Expr::Component { base, component } => {
                write_operand(f, base, base.precedence() < PRIMARY)?;
                write!(f, "%{}", component)
            }
            Expr::FunctionRef { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, (keyword, arg)) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if let Some(keyword) = keyword {
                        write!(f, "{}=", keyword)?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Parentheses(inner) => write!(f, "({})", inner),
            Expr::Unary { operator, operand } => {
                write!(f, "{}", operator.spelling())?;
                let own = unary_precedence(*operator);
                write_operand(f, operand, operand.precedence() <= own)
            }
            Expr::Binary { operator, left, right } => {
                let own = binary_precedence(*operator);
                // `**` groups right to left, everything else left to right.
                let (left_parens, right_parens) = if *operator == BinaryOperator::Power {
                    (left.precedence() <= own, right.precedence() < own)
                } else {
                    (left.precedence() < own, right.precedence() <= own)
                };
                write_operand(f, left, left_parens)?;
                write!(f, "{}", operator.spelling())?;
                write_operand(f, right, right_parens)
            }
        }
    }
}
