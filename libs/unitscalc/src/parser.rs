//! Expression parser - converts token sequences to expression trees
//!
//! Recursive descent with an explicit state per expression level:
//!
//! ```text
//! expression  := term (('+' | '-') term)*
//! term        := measurement | '(' expression ')'
//! measurement := number unit
//! ```
//!
//! Operators are left-associative and share one precedence level. A `)` ends
//! the current level without being consumed; the level that opened the bracket
//! consumes it.

use crate::ast::Expression;
use crate::error::{Error, Result};
use crate::lexer;
use crate::token::Token;
use rust_decimal::Decimal;

const MAX_NESTING_DEPTH: usize = 200;

/// Position within one expression level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Expecting the first term.
    Start,
    /// A complete term was read; expecting `+`, `-`, `)` or the end.
    AfterTerm,
    AfterPlus,
    AfterMinus,
}

impl ParserState {
    fn expectation(self) -> &'static str {
        match self {
            ParserState::Start => "a measurement or '('",
            ParserState::AfterTerm => "'+', '-', ')' or end of input",
            ParserState::AfterPlus | ParserState::AfterMinus => {
                "a measurement or '(' after operator"
            }
        }
    }
}

/// Parser over a complete token sequence
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse the whole sequence into one expression.
    pub fn parse(&mut self) -> Result<Expression> {
        let expr = self.parse_expression()?;

        // Ensure we've consumed all input
        if let Some(token) = self.peek() {
            return Err(Error::Syntax(format!(
                "Unexpected '{}' after complete expression: too many tokens, bracket mismatch maybe",
                token
            )));
        }

        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// One level: terms joined by `+` / `-`, folded to the left.
    fn parse_expression(&mut self) -> Result<Expression> {
        let mut parsed: Option<Expression> = None;
        let mut state = ParserState::Start;

        while let Some(token) = self.peek().cloned() {
            match (state, token) {
                // Leave the bracket to the level that opened it.
                (ParserState::AfterTerm, Token::CloseBracket) => break,
                (ParserState::AfterTerm, Token::Plus) => {
                    self.position += 1;
                    state = ParserState::AfterPlus;
                }
                (ParserState::AfterTerm, Token::Minus) => {
                    self.position += 1;
                    state = ParserState::AfterMinus;
                }
                (
                    ParserState::Start | ParserState::AfterPlus | ParserState::AfterMinus,
                    Token::Number(_) | Token::OpenBracket,
                ) => {
                    let term = self.parse_term()?;
                    parsed = Some(match (state, parsed.take()) {
                        (ParserState::AfterPlus, Some(left)) => Expression::addition(left, term),
                        (ParserState::AfterMinus, Some(left)) => {
                            Expression::subtraction(left, term)
                        }
                        _ => term,
                    });
                    state = ParserState::AfterTerm;
                }
                (state, token) => {
                    return Err(Error::Syntax(format!(
                        "'{}' in wrong place, expected {}",
                        token,
                        state.expectation()
                    )));
                }
            }
        }

        match (state, parsed) {
            (ParserState::AfterTerm, Some(expr)) => Ok(expr),
            (state, _) => Err(Error::Syntax(format!(
                "Expected {}, but reached end of input",
                state.expectation()
            ))),
        }
    }

    fn parse_term(&mut self) -> Result<Expression> {
        match self.next() {
            Some(Token::Number(amount)) => self.parse_measurement(amount),
            Some(Token::OpenBracket) => self.parse_brackets(),
            Some(token) => Err(Error::Syntax(format!(
                "'{}' in wrong place, expected a measurement or '('",
                token
            ))),
            None => Err(Error::Syntax(
                "Expected a measurement or '(', but reached end of input".into(),
            )),
        }
    }

    fn parse_measurement(&mut self, amount: Decimal) -> Result<Expression> {
        match self.next() {
            Some(Token::Unit(unit)) => Ok(Expression::measurement(amount, unit)),
            Some(token) => Err(Error::Syntax(format!(
                "Expected unit after number {}, got '{}'",
                amount, token
            ))),
            None => Err(Error::Syntax(format!(
                "Expected unit after number {}, but reached end of input",
                amount
            ))),
        }
    }

    fn parse_brackets(&mut self) -> Result<Expression> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(Error::Syntax(format!(
                "Expression too deeply nested (max depth: {})",
                MAX_NESTING_DEPTH
            )));
        }
        let inner = self.parse_expression()?;
        self.depth -= 1;

        match self.next() {
            Some(Token::CloseBracket) => Ok(Expression::brackets(inner)),
            Some(token) => Err(Error::Syntax(format!(
                "'{}' instead of closing bracket",
                token
            ))),
            None => Err(Error::Syntax("No closing bracket".into())),
        }
    }
}

/// Parse a token sequence.
pub fn parse(tokens: Vec<Token>) -> Result<Expression> {
    let expr = Parser::new(tokens).parse()?;
    tracing::debug!(nodes = expr.node_count(), "parsed expression");
    Ok(expr)
}

/// Tokenize and parse `input`.
pub fn parse_str(input: &str) -> Result<Expression> {
    parse(lexer::tokenize(input)?)
}
