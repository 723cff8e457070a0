//! Evaluation of expression trees
//!
//! Evaluation runs in two steps. `values` sums amounts per unit without any
//! conversion. `convert` then scales each bucket into the target unit through
//! the ratio table and adds them up.

use crate::ast::{Expression, Measurement};
use crate::error::{Error, Result};
use crate::units::{ratios, Unit};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Signed amount per unit, ordered by unit declaration order.
pub type UnitValues = BTreeMap<Unit, Decimal>;

/// Reduce `expression` to its per-unit totals.
///
/// Leaves are visited left to right with the sign they carry after any
/// enclosing subtractions.
pub fn values(expression: &Expression) -> Result<UnitValues> {
    let mut totals = UnitValues::new();
    let mut pending = vec![(expression, false)];

    while let Some((node, negated)) = pending.pop() {
        match node {
            Expression::Measurement(m) => {
                let current = totals.entry(m.unit).or_insert(Decimal::ZERO);
                let updated = if negated {
                    current.checked_sub(m.amount)
                } else {
                    current.checked_add(m.amount)
                };
                *current = updated.ok_or(Error::Overflow)?;
            }
            Expression::Addition(left, right) => {
                pending.push((&**right, negated));
                pending.push((&**left, negated));
            }
            Expression::Subtraction(left, right) => {
                pending.push((&**right, !negated));
                pending.push((&**left, negated));
            }
            Expression::Brackets(inner) => pending.push((&**inner, negated)),
        }
    }

    Ok(totals)
}

/// Evaluate `expression` as a single measurement in `target`.
pub fn convert(expression: &Expression, target: Unit) -> Result<Measurement> {
    let buckets = values(expression)?;
    tracing::debug!(buckets = ?buckets, target = %target, "converting expression");

    let table = ratios();
    let mut total = Decimal::ZERO;
    for (unit, amount) in buckets {
        let scaled = amount
            .checked_mul(table.get(unit, target))
            .ok_or(Error::Overflow)?;
        total = total.checked_add(scaled).ok_or(Error::Overflow)?;
    }

    Ok(Measurement::new(total, target))
}

/// Evaluate `expression` into the unit named by `target_code`.
pub fn calculate(expression: &Expression, target_code: &str) -> Result<Measurement> {
    let target = Unit::from_str(target_code.trim())?;
    convert(expression, target)
}
