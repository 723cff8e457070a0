//! Units calculator - arithmetic over length measurements with mixed units
//!
//! ```text
//! Expression String
//!      |
//!   Lexer -> Tokens
//!      |
//!   Parser -> Expression tree
//!      |
//!   values() -> amount per unit
//!      |
//!   convert() -> one Measurement in the target unit
//!      |
//!   Formatter -> canonical text
//! ```
//!
//! The formatter also renders parsed input trees, so what was understood can
//! be shown back to the user in canonical form.

#![forbid(unsafe_code)]

pub mod ast;
pub mod error;
pub mod eval;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod units;

pub use ast::{Expression, Measurement};
pub use error::{Error, Result};
pub use eval::{calculate, convert, values, UnitValues};
pub use format::{FormatOptions, Formatter};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_str, Parser};
pub use token::Token;
pub use units::{ratio, ratios, RatioTable, Unit};

/// The three operations a front end needs: analyze input, calculate a
/// result, and print expressions back.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    formatter: Formatter,
}

impl Calculator {
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self::new(Formatter::new(options))
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Tokenize and parse user input.
    pub fn analyze(&self, input: &str) -> Result<Expression> {
        tracing::debug!(input, "analyzing expression");
        parse_str(input)
    }

    /// Evaluate into the unit named by `target_code` (case-insensitive).
    pub fn calculate(&self, expression: &Expression, target_code: &str) -> Result<Measurement> {
        let result = calculate(expression, target_code)?;
        tracing::debug!(
            amount = %result.amount,
            unit = %result.unit,
            "calculated expression"
        );
        Ok(result)
    }

    /// Canonical text of any expression node.
    pub fn pretty_print(&self, expression: &Expression) -> String {
        self.formatter.format(expression)
    }

    pub fn format_result(&self, measurement: &Measurement) -> String {
        self.formatter.format_measurement(measurement)
    }
}
