//! Unit tests for the expression parser

use rust_decimal::Decimal;
use std::str::FromStr;
use unitscalc::ast::Expression;
use unitscalc::parser::{parse, parse_str};
use unitscalc::token::Token;
use unitscalc::units::Unit;
use unitscalc::Calculator;

fn m(amount: &str, unit: Unit) -> Expression {
    Expression::measurement(Decimal::from_str(amount).unwrap(), unit)
}

const COMPLEX: &str = "  -123.457mm+ .1cm+ -.1cm - (( ( 4cm --1cm)) -(0.457mm ) )  ";

#[test]
fn test_parse_complex_structure() {
    let expr = parse_str(COMPLEX).unwrap();
    let inner = Expression::brackets(Expression::subtraction(m("4", Unit::Cm), m("-1", Unit::Cm)));
    let group = Expression::brackets(Expression::subtraction(inner, m("0.457", Unit::Mm)));
    let expected = Expression::subtraction(
        Expression::addition(
            Expression::addition(m("-123.457", Unit::Mm), m("0.1", Unit::Cm)),
            m("-0.1", Unit::Cm),
        ),
        group,
    );
    assert_eq!(expr, expected);
}

#[test]
fn test_pretty_print_complex() {
    let calculator = Calculator::default();
    let expr = calculator.analyze(COMPLEX).unwrap();
    assert_eq!(
        calculator.pretty_print(&expr),
        "-123.457mm + 0.1cm + (-0.1cm) - ((4cm - (-1cm)) - 0.457mm)"
    );
}

#[test]
fn test_pretty_print_round_trip() {
    let calculator = Calculator::default();
    let inputs = [
        COMPLEX,
        "1cm+-2cm-3cm+3.5cm",
        "((1in))",
        "1mm - (2mm - (3mm - (4mm - 5mm)))",
        "(1px + 2pt) - (-3mm)",
        ".5in - -.5in",
    ];
    for input in inputs {
        let first = calculator.pretty_print(&calculator.analyze(input).unwrap());
        let second = calculator.pretty_print(&calculator.analyze(&first).unwrap());
        assert_eq!(first, second, "round trip of {:?}", input);
    }
}

#[test]
fn test_bare_number_fails_to_parse() {
    let tokens = unitscalc::tokenize("123").unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(parse(tokens).unwrap_err().is_syntax());
}

#[test]
fn test_syntax_errors() {
    // Unit with no number
    assert!(parse(vec![Token::Unit(Unit::Mm)]).unwrap_err().is_syntax());
    // Two measurements without an operator
    let tokens = vec![
        Token::Number(Decimal::ONE),
        Token::Unit(Unit::Mm),
        Token::Number(Decimal::ONE),
        Token::Unit(Unit::Mm),
    ];
    assert!(parse(tokens).unwrap_err().is_syntax());
    // Empty brackets
    assert!(parse(vec![Token::OpenBracket, Token::CloseBracket])
        .unwrap_err()
        .is_syntax());
    // Unbalanced brackets
    assert!(parse_str("((1mm)").unwrap_err().is_syntax());
    assert!(parse_str("(1mm))").unwrap_err().is_syntax());
}

#[test]
fn test_lex_errors_surface_through_analyze() {
    let calculator = Calculator::default();
    let err = calculator.analyze("").unwrap_err();
    assert!(err.is_lex());
    let err = calculator.analyze("1mm + 2").unwrap_err();
    assert!(err.is_syntax());
}
