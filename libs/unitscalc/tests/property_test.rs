//! Property-based tests using QuickCheck

use quickcheck::{Arbitrary, Gen, QuickCheck};
use rust_decimal::Decimal;
use unitscalc::{parse_str, ratio, values, Expression, Formatter, Unit, UnitValues};

/// Random expression tree with amounts that format without rounding.
#[derive(Debug, Clone)]
struct ArbExpr(Expression);

impl Arbitrary for ArbExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbExpr(gen_expr(g, 4, 4))
    }
}

/// Random expression tree whose amounts carry up to 6 fraction digits, so
/// formatting rounds them.
#[derive(Debug, Clone)]
struct ArbRoundedExpr(Expression);

impl Arbitrary for ArbRoundedExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbRoundedExpr(gen_expr(g, 4, 7))
    }
}

fn gen_amount(g: &mut Gen, scales: u32) -> Decimal {
    let digits = i64::from(i32::arbitrary(g) % 1_000_000);
    let scale = u32::arbitrary(g) % scales;
    Decimal::new(digits, scale)
}

fn gen_expr(g: &mut Gen, depth: u32, scales: u32) -> Expression {
    let unit = *g.choose(&Unit::ALL).unwrap();
    if depth == 0 {
        return Expression::measurement(gen_amount(g, scales), unit);
    }
    match u8::arbitrary(g) % 4 {
        0 => Expression::measurement(gen_amount(g, scales), unit),
        1 => Expression::addition(
            gen_expr(g, depth - 1, scales),
            gen_expr(g, depth - 1, scales),
        ),
        2 => Expression::subtraction(
            gen_expr(g, depth - 1, scales),
            gen_expr(g, depth - 1, scales),
        ),
        _ => Expression::brackets(gen_expr(g, depth - 1, scales)),
    }
}

fn get_or_zero(map: &UnitValues, unit: Unit) -> Decimal {
    map.get(&unit).copied().unwrap_or(Decimal::ZERO)
}

/// Property: formatting a parsed expression is stable under re-parsing
#[test]
fn prop_round_trip_is_idempotent() {
    fn prop(expr: ArbExpr) -> bool {
        let formatter = Formatter::default();
        let source = formatter.format(&expr.0);
        let first = formatter.format(&parse_str(&source).unwrap());
        let second = formatter.format(&parse_str(&first).unwrap());
        first == second
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbExpr) -> bool);
}

/// Property: rounding during formatting keeps the round trip stable
#[test]
fn prop_rounded_round_trip_is_stable() {
    fn prop(expr: ArbRoundedExpr) -> bool {
        let formatter = Formatter::default();
        let source = formatter.format(&expr.0);
        let first = formatter.format(&parse_str(&source).unwrap());
        let second = formatter.format(&parse_str(&first).unwrap());
        let no_negative_zero = first
            .match_indices("-0")
            .all(|(i, _)| first[i + 2..].starts_with('.'));
        first == second && no_negative_zero
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbRoundedExpr) -> bool);
}

#[test]
fn rounding_to_zero_drops_sign_and_parentheses() {
    let formatter = Formatter::default();
    let expr = Expression::addition(
        Expression::measurement(Decimal::ONE, Unit::Mm),
        Expression::measurement(Decimal::new(-4, 4), Unit::Mm),
    );
    let text = formatter.format(&expr);
    assert_eq!(text, "1mm + 0mm");
    assert_eq!(formatter.format(&parse_str(&text).unwrap()), text);

    let expr = Expression::subtraction(
        Expression::measurement(Decimal::ONE, Unit::Mm),
        Expression::measurement(Decimal::new(-6, 4), Unit::Mm),
    );
    let text = formatter.format(&expr);
    assert_eq!(text, "1mm - (-0.001mm)");
    assert_eq!(formatter.format(&parse_str(&text).unwrap()), text);
}

/// Property: re-parsing canonical text keeps the per-unit totals
#[test]
fn prop_round_trip_preserves_values() {
    fn prop(expr: ArbExpr) -> bool {
        let formatter = Formatter::default();
        let parsed = parse_str(&formatter.format(&expr.0)).unwrap();
        let reparsed = parse_str(&formatter.format(&parsed)).unwrap();
        values(&parsed).unwrap() == values(&reparsed).unwrap()
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbExpr) -> bool);
}

/// Property: values of a sum are the unit-wise sum of the operands' values
#[test]
fn prop_addition_merges_buckets() {
    fn prop(x: ArbExpr, y: ArbExpr) -> bool {
        let vx = values(&x.0).unwrap();
        let vy = values(&y.0).unwrap();
        let sum = values(&Expression::addition(x.0, y.0)).unwrap();
        Unit::ALL.into_iter().all(|u| {
            get_or_zero(&sum, u) == get_or_zero(&vx, u) + get_or_zero(&vy, u)
        }) && sum.keys().all(|u| vx.contains_key(u) || vy.contains_key(u))
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(ArbExpr, ArbExpr) -> bool);
}

/// Property: values of a difference flip the sign of the right operand
#[test]
fn prop_subtraction_flips_right_operand() {
    fn prop(x: ArbExpr, y: ArbExpr) -> bool {
        let vx = values(&x.0).unwrap();
        let vy = values(&y.0).unwrap();
        let diff = values(&Expression::subtraction(x.0, y.0)).unwrap();
        Unit::ALL.into_iter().all(|u| {
            get_or_zero(&diff, u) == get_or_zero(&vx, u) - get_or_zero(&vy, u)
        })
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(ArbExpr, ArbExpr) -> bool);
}

/// Property: brackets never change values
#[test]
fn prop_brackets_are_transparent() {
    fn prop(x: ArbExpr) -> bool {
        let grouped = Expression::Brackets(Box::new(x.0.clone()));
        values(&grouped).unwrap() == values(&x.0).unwrap()
    }
    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(ArbExpr) -> bool);
}

#[test]
fn identity_ratios_are_one() {
    for unit in Unit::ALL {
        assert_eq!(ratio(unit, unit), Decimal::ONE);
    }
}

#[test]
fn ratios_are_reciprocal_within_tolerance() {
    let tolerance = Decimal::new(1, 5);
    for a in Unit::ALL {
        for b in Unit::ALL {
            let product = ratio(a, b) * ratio(b, a);
            assert!(
                (product - Decimal::ONE).abs() <= tolerance,
                "ratio {}->{} times {}->{} = {}",
                a,
                b,
                b,
                a,
                product
            );
        }
    }
}
