//! Expression tree
//!
//! Grammar placement (informal):
//!
//! ```text
//! expression  := term (('+' | '-') term)*
//! term        := factor
//! factor      := measurement | '(' expression ')'
//! measurement := number unit
//! ```
//!
//! Terms and factors carry no data of their own, so the tree is a single enum.
//! `is_term` / `is_factor` report the placement class of a node.

use crate::units::Unit;
use rust_decimal::Decimal;
use std::fmt;

/// A signed amount of one unit; the leaf of every tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    pub amount: Decimal,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(amount: Decimal, unit: Unit) -> Self {
        Self { amount, unit }
    }
}

/// Node of an expression tree. Children are owned exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expression {
    Measurement(Measurement),
    Addition(Box<Expression>, Box<Expression>),
    Subtraction(Box<Expression>, Box<Expression>),
    /// Explicit grouping, kept only around compound nodes.
    Brackets(Box<Expression>),
}

impl Expression {
    pub fn measurement(amount: Decimal, unit: Unit) -> Self {
        Expression::Measurement(Measurement::new(amount, unit))
    }

    pub fn addition(left: Expression, right: Expression) -> Self {
        Expression::Addition(Box::new(left), Box::new(right))
    }

    pub fn subtraction(left: Expression, right: Expression) -> Self {
        Expression::Subtraction(Box::new(left), Box::new(right))
    }

    /// Group `inner`, collapsing groups that carry no meaning.
    ///
    /// A measurement or an existing group is returned as is.
    pub fn brackets(inner: Expression) -> Self {
        match inner {
            Expression::Measurement(_) | Expression::Brackets(_) => inner,
            compound => Expression::Brackets(Box::new(compound)),
        }
    }

    /// Leaf or group: usable as an operand without extra parentheses.
    pub fn is_factor(&self) -> bool {
        matches!(self, Expression::Measurement(_) | Expression::Brackets(_))
    }

    /// Multiplicative terms are not part of the grammar, so every factor is a
    /// term and nothing else is.
    pub fn is_term(&self) -> bool {
        self.is_factor()
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            match node {
                Expression::Measurement(_) => {}
                Expression::Addition(l, r) | Expression::Subtraction(l, r) => {
                    pending.push(&**r);
                    pending.push(&**l);
                }
                Expression::Brackets(inner) => pending.push(&**inner),
            }
        }
        count
    }

    // Moves compound children into `pending`, leaving leaves in their place.
    fn detach_children(&mut self, pending: &mut Vec<Expression>) {
        let mut detach = |child: &mut Box<Expression>| {
            if !matches!(**child, Expression::Measurement(_)) {
                pending.push(std::mem::replace(&mut **child, Expression::placeholder()));
            }
        };
        match self {
            Expression::Measurement(_) => {}
            Expression::Addition(l, r) | Expression::Subtraction(l, r) => {
                detach(l);
                detach(r);
            }
            Expression::Brackets(inner) => detach(inner),
        }
    }

    fn placeholder() -> Self {
        Expression::measurement(Decimal::ZERO, Unit::Mm)
    }
}

// Long `+`/`-` chains are deep on the left; drop them without recursion.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl From<Measurement> for Expression {
    fn from(m: Measurement) -> Self {
        Expression::Measurement(m)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::Formatter::default().format_measurement(self))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::Formatter::default().format(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(amount: i64, unit: Unit) -> Expression {
        Expression::measurement(Decimal::from(amount), unit)
    }

    #[test]
    fn brackets_collapse_around_leaf() {
        assert_eq!(Expression::brackets(m(1, Unit::Cm)), m(1, Unit::Cm));
    }

    #[test]
    fn brackets_collapse_around_group() {
        let sum = Expression::addition(m(1, Unit::Cm), m(2, Unit::Mm));
        let once = Expression::brackets(sum);
        let twice = Expression::brackets(once.clone());
        assert_eq!(once, twice);
        assert!(matches!(twice, Expression::Brackets(_)));
    }

    #[test]
    fn placement_classes() {
        let sum = Expression::addition(m(1, Unit::Cm), m(2, Unit::Mm));
        assert!(!sum.is_term());
        assert!(Expression::brackets(sum).is_factor());
        assert!(m(1, Unit::Pt).is_term());
    }

    #[test]
    fn counts_nodes() {
        let tree = Expression::subtraction(
            m(1, Unit::Cm),
            Expression::brackets(Expression::addition(m(1, Unit::In), m(2, Unit::Px))),
        );
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn long_chain_counts_and_drops() {
        let mut chain = m(1, Unit::Mm);
        for _ in 0..100_000 {
            chain = Expression::addition(chain, m(1, Unit::Mm));
        }
        assert_eq!(chain.node_count(), 200_001);
        drop(chain);
    }
}
