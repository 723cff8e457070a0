//! Expression lexer - tokenizes input strings
//!
//! A finite-state machine over character classes. The state decides what a
//! character means: a `-` seen where an operand begins is the sign of a number
//! literal, a `-` seen after a unit is the subtraction operator.

use crate::error::{Error, Result};
use crate::token::Token;
use crate::units::Unit;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Lexer position within the grammar of a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Beginning of an operand.
    Start,
    AfterMinusBeforeDigit,
    InIntegerPart,
    /// Just read `.`; a fraction needs at least one digit.
    InFractionFirstDigit,
    InFraction,
    /// Number finished by whitespace; a unit must follow.
    AfterNumber,
    InUnitLetters,
    AfterUnit,
}

/// Classification of a single input character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Space,
    Digit,
    Letter,
    OpenBracket,
    CloseBracket,
    Minus,
    Plus,
    Point,
}

impl CharClass {
    /// Classify `c`, or `None` if it may never appear in an expression.
    pub fn of(c: char) -> Option<Self> {
        match c {
            c if c.is_whitespace() => Some(CharClass::Space),
            c if c.is_ascii_digit() => Some(CharClass::Digit),
            c if c.is_alphabetic() => Some(CharClass::Letter),
            '(' => Some(CharClass::OpenBracket),
            ')' => Some(CharClass::CloseBracket),
            '-' => Some(CharClass::Minus),
            '+' => Some(CharClass::Plus),
            '.' => Some(CharClass::Point),
            _ => None,
        }
    }
}

/// The expression lexer
pub struct Lexer<'a> {
    input: &'a str,
    state: LexState,
    buffer: String,
    /// Character offset where the buffered lexeme started.
    buffer_start: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            state: LexState::Start,
            buffer: String::new(),
            buffer_start: 0,
            tokens: Vec::new(),
        }
    }

    pub fn state(&self) -> LexState {
        self.state
    }

    /// Run the machine over the whole input.
    ///
    /// Either every character is consumed and all tokens are returned, or the
    /// first offending character is reported. No partial sequence escapes.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let input = self.input;
        let mut length = 0;
        for (pos, c) in input.chars().enumerate() {
            let class = CharClass::of(c).ok_or_else(|| {
                self.error(
                    pos,
                    "Expected space, digit, letter, '(', ')', '-', '+' or '.'",
                )
            })?;
            self.state = self.step(pos, c, class)?;
            length = pos + 1;
        }
        self.finish(length)?;

        tracing::trace!(tokens = self.tokens.len(), "tokenized expression");
        Ok(self.tokens)
    }

    /// Transition function: consume one classified character.
    fn step(&mut self, pos: usize, c: char, class: CharClass) -> Result<LexState> {
        use CharClass as C;
        use LexState as S;

        let next = match (self.state, class) {
            (S::Start, C::Space) => S::Start,
            (S::Start, C::OpenBracket) => {
                self.tokens.push(Token::OpenBracket);
                S::Start
            }
            (S::Start, C::Minus) => {
                self.begin(pos, c);
                S::AfterMinusBeforeDigit
            }
            (S::Start, C::Digit) => {
                self.begin(pos, c);
                S::InIntegerPart
            }
            (S::Start, C::Point) => {
                self.begin(pos, c);
                S::InFractionFirstDigit
            }
            (S::Start, _) => return Err(self.error(pos, "Expected space, digit, '(', '-' or '.'")),

            (S::AfterMinusBeforeDigit, C::Digit) => {
                self.buffer.push(c);
                S::InIntegerPart
            }
            (S::AfterMinusBeforeDigit, C::Point) => {
                self.buffer.push(c);
                S::InFractionFirstDigit
            }
            (S::AfterMinusBeforeDigit, _) => return Err(self.error(pos, "Expected digit or '.'")),

            (S::InIntegerPart | S::InFraction, C::Space) => {
                self.flush_number()?;
                S::AfterNumber
            }
            (S::InIntegerPart | S::InFraction, C::Letter) => {
                self.flush_number()?;
                self.begin(pos, c);
                S::InUnitLetters
            }
            (S::InIntegerPart, C::Digit) => {
                self.buffer.push(c);
                S::InIntegerPart
            }
            (S::InIntegerPart, C::Point) => {
                self.buffer.push(c);
                S::InFractionFirstDigit
            }
            (S::InIntegerPart, _) => {
                return Err(self.error(pos, "Expected space, digit, letter or '.'"))
            }

            (S::InFractionFirstDigit, C::Digit) => {
                self.buffer.push(c);
                S::InFraction
            }
            (S::InFractionFirstDigit, _) => return Err(self.error(pos, "Expected digit")),

            (S::InFraction, C::Digit) => {
                self.buffer.push(c);
                S::InFraction
            }
            (S::InFraction, _) => return Err(self.error(pos, "Expected space, digit or letter")),

            (S::AfterNumber, C::Space) => S::AfterNumber,
            (S::AfterNumber, C::Letter) => {
                self.begin(pos, c);
                S::InUnitLetters
            }
            (S::AfterNumber, _) => return Err(self.error(pos, "Expected space or letter")),

            (S::InUnitLetters, C::Letter) => {
                self.buffer.push(c);
                S::InUnitLetters
            }
            (S::InUnitLetters, C::Space) => {
                self.flush_unit()?;
                S::AfterUnit
            }
            (S::InUnitLetters, C::Plus) => {
                self.flush_unit()?;
                self.tokens.push(Token::Plus);
                S::Start
            }
            (S::InUnitLetters, C::Minus) => {
                self.flush_unit()?;
                self.tokens.push(Token::Minus);
                S::Start
            }
            (S::InUnitLetters, C::CloseBracket) => {
                self.flush_unit()?;
                self.tokens.push(Token::CloseBracket);
                S::AfterUnit
            }
            (S::InUnitLetters, _) => {
                return Err(self.error(pos, "Expected space, letter, ')', '-' or '+'"))
            }

            (S::AfterUnit, C::Space) => S::AfterUnit,
            (S::AfterUnit, C::Plus) => {
                self.tokens.push(Token::Plus);
                S::Start
            }
            (S::AfterUnit, C::Minus) => {
                self.tokens.push(Token::Minus);
                S::Start
            }
            (S::AfterUnit, C::CloseBracket) => {
                self.tokens.push(Token::CloseBracket);
                S::AfterUnit
            }
            (S::AfterUnit, _) => return Err(self.error(pos, "Expected space, ')', '-' or '+'")),
        };
        Ok(next)
    }

    /// Handle end of input; `length` is the input length in characters.
    fn finish(&mut self, length: usize) -> Result<()> {
        match self.state {
            LexState::InUnitLetters => self.flush_unit(),
            LexState::InIntegerPart | LexState::InFraction => self.flush_number(),
            LexState::AfterNumber | LexState::AfterUnit => Ok(()),
            LexState::Start
            | LexState::AfterMinusBeforeDigit
            | LexState::InFractionFirstDigit => Err(self.error(length, "Unexpected end of data")),
        }
    }

    fn begin(&mut self, pos: usize, c: char) {
        self.buffer.clear();
        self.buffer.push(c);
        self.buffer_start = pos;
    }

    fn flush_number(&mut self) -> Result<()> {
        let literal = std::mem::take(&mut self.buffer);
        // `.5` and `-.5` are accepted; give the decimal parser a leading zero.
        let normalized = if let Some(rest) = literal.strip_prefix("-.") {
            format!("-0.{}", rest)
        } else if let Some(rest) = literal.strip_prefix('.') {
            format!("0.{}", rest)
        } else {
            literal
        };
        let value = Decimal::from_str(&normalized).map_err(|_| {
            self.error(self.buffer_start, "Expected a number within decimal range")
        })?;
        self.tokens.push(Token::Number(value));
        Ok(())
    }

    fn flush_unit(&mut self) -> Result<()> {
        let name = std::mem::take(&mut self.buffer);
        let unit = Unit::from_str(&name).map_err(|_| {
            self.error(
                self.buffer_start,
                format!("Unknown unit '{}', expected mm, cm, in, px or pt", name),
            )
        })?;
        self.tokens.push(Token::Unit(unit));
        Ok(())
    }

    fn error(&self, position: usize, expected: impl Into<String>) -> Error {
        Error::lex(self.input, position, expected)
    }
}

/// Convert `input` into its token sequence.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
