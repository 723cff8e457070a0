//! Token types for the expression lexer

use crate::units::Unit;
use rust_decimal::Decimal;
use std::fmt;

/// A lexical element of a measurement expression.
///
/// Tokens carry no source offsets; positions only matter for lexical errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    OpenBracket,  // (
    CloseBracket, // )
    Plus,         // +
    Minus,        // -
    /// Signed decimal literal; a leading `-` belongs to the number.
    Number(Decimal),
    Unit(Unit),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenBracket => write!(f, "("),
            Token::CloseBracket => write!(f, ")"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Number(value) => write!(f, "{}", value),
            Token::Unit(unit) => write!(f, "{}", unit),
        }
    }
}
