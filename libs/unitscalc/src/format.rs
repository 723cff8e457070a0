//! Canonical text rendering of expressions
//!
//! Output of `Formatter::format` is valid input again, and formatting the
//! re-parsed text gives back the same string.

use crate::ast::{Expression, Measurement};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Digits kept after the decimal point; trailing zeros are dropped.
    pub max_fraction_digits: u32,
    /// Separate thousands in the integer part with `,`.
    pub grouping: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_fraction_digits: 3,
            grouping: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Render any node of a tree.
    ///
    /// The left spine of `+`/`-` chains is walked in a loop; right operands
    /// of parsed trees are leaves or groups, so recursion only follows
    /// bracket nesting.
    pub fn format(&self, expression: &Expression) -> String {
        let mut operations = Vec::new();
        let mut leftmost = expression;
        loop {
            match leftmost {
                Expression::Addition(left, right) => {
                    operations.push(("+", &**right));
                    leftmost = &**left;
                }
                Expression::Subtraction(left, right) => {
                    operations.push(("-", &**right));
                    leftmost = &**left;
                }
                _ => break,
            }
        }

        let mut text = self.format_operand(leftmost);
        for (operator, right) in operations.into_iter().rev() {
            self.append_operation(&mut text, operator, right);
        }
        text
    }

    fn format_operand(&self, expression: &Expression) -> String {
        match expression {
            Expression::Measurement(m) => self.format_measurement(m),
            Expression::Brackets(inner) => format!("({})", self.format(inner)),
            compound => self.format(compound),
        }
    }

    pub fn format_measurement(&self, measurement: &Measurement) -> String {
        format!(
            "{}{}",
            self.format_decimal(&measurement.amount),
            measurement.unit.code()
        )
    }

    /// Round half to even, drop trailing zeros, `.` as the decimal point.
    pub fn format_decimal(&self, value: &Decimal) -> String {
        let rounded = value
            .round_dp_with_strategy(
                self.options.max_fraction_digits,
                RoundingStrategy::MidpointNearestEven,
            )
            .normalize();
        let text = rounded.to_string();
        if self.options.grouping {
            group_thousands(&text)
        } else {
            text
        }
    }

    // A negative measurement on the right gets parentheses, never `a + -b`.
    fn append_operation(&self, text: &mut String, operator: &str, right: &Expression) {
        let right_text = self.format_operand(right);
        text.push(' ');
        text.push_str(operator);
        text.push(' ');
        if matches!(right, Expression::Measurement(_)) && right_text.starts_with('-') {
            text.push('(');
            text.push_str(&right_text);
            text.push(')');
        } else {
            text.push_str(&right_text);
        }
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
