// tests/parser_tests.rs

use rule_lang::ast::{CompareOp, Comparison, Expr, LogicalOp, Operand};
use rule_lang::parser::{MAX_NESTING, ParseError, ParseMode, Parser};
use rule_lang::value::Literal;
use rule_lang::{RuleError, create_rule, create_rule_with_mode};

fn parse(input: &str) -> Expr {
    create_rule(input).unwrap()
}

fn parse_err(input: &str) -> ParseError {
    match create_rule(input) {
        Err(RuleError::Parse(e)) => e,
        other => panic!("Expected parse error for {input:?}, got {other:?}"),
    }
}

fn leaf(field: &str, op: CompareOp, value: impl Into<Literal>) -> Expr {
    Expr::compare(field, op, value)
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_all_comparison_operators() {
    let test_cases = vec![
        ("x > 1", CompareOp::GreaterThan),
        ("x < 1", CompareOp::LessThan),
        ("x = 1", CompareOp::Equal),
        ("x != 1", CompareOp::NotEqual),
        ("x >= 1", CompareOp::GreaterEqual),
        ("x <= 1", CompareOp::LessEqual),
    ];

    for (input, op) in test_cases {
        assert_eq!(parse(input), leaf("x", op, 1.0), "Failed for input: {}", input);
    }
}

#[test]
fn test_string_and_decimal_literals() {
    assert_eq!(
        parse("department = 'Sales'"),
        leaf("department", CompareOp::Equal, "Sales")
    );
    assert_eq!(
        parse(r#"department = "Marketing""#),
        leaf("department", CompareOp::Equal, "Marketing")
    );
    assert_eq!(
        parse("salary >= 5000.50"),
        leaf("salary", CompareOp::GreaterEqual, 5000.5)
    );
}

#[test]
fn test_bare_word_on_right_is_text() {
    assert_eq!(
        parse("department = Sales"),
        leaf("department", CompareOp::Equal, "Sales")
    );
}

#[test]
fn test_no_whitespace_needed() {
    assert_eq!(parse("age>30"), leaf("age", CompareOp::GreaterThan, 30.0));
}

// ============================================================================
// Precedence and Associativity
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse("a = 1 OR b = 2 AND c = 3");
    let expected = Expr::logical(
        LogicalOp::Or,
        leaf("a", CompareOp::Equal, 1.0),
        Expr::logical(
            LogicalOp::And,
            leaf("b", CompareOp::Equal, 2.0),
            leaf("c", CompareOp::Equal, 3.0),
        ),
    );
    assert_eq!(expr, expected);
    assert_eq!(expr, parse("a = 1 OR (b = 2 AND c = 3)"));
}

#[test]
fn test_or_is_left_associative() {
    let expected = Expr::logical(
        LogicalOp::Or,
        Expr::logical(
            LogicalOp::Or,
            leaf("a", CompareOp::Equal, 1.0),
            leaf("b", CompareOp::Equal, 2.0),
        ),
        leaf("c", CompareOp::Equal, 3.0),
    );
    assert_eq!(parse("a = 1 OR b = 2 OR c = 3"), expected);
}

#[test]
fn test_and_is_left_associative() {
    match &parse("a = 1 and b = 2 and c = 3") {
        Expr::Logical {
            op: LogicalOp::And,
            left,
            right,
        } => {
            assert!(matches!(**left, Expr::Logical { op: LogicalOp::And, .. }));
            assert_eq!(**right, leaf("c", CompareOp::Equal, 3.0));
        }
        other => panic!("Expected AND at the root, got {other:?}"),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    match &parse("(a = 1 OR b = 2) AND c = 3") {
        Expr::Logical {
            op: LogicalOp::And,
            left,
            ..
        } => {
            assert!(matches!(**left, Expr::Logical { op: LogicalOp::Or, .. }));
        }
        other => panic!("Expected AND at the root, got {other:?}"),
    }
}

#[test]
fn test_nested_groups() {
    let expr = parse(
        "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)",
    );
    assert_eq!(expr.leaf_count(), 6);
    assert_eq!(
        expr.to_string(),
        "(((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5))"
    );
}

#[test]
fn test_redundant_parentheses() {
    assert_eq!(parse("(((age > 30)))"), leaf("age", CompareOp::GreaterThan, 30.0));
}

// ============================================================================
// Bare Operands
// ============================================================================

#[test]
fn test_bare_operand_lenient() {
    assert_eq!(
        parse("active"),
        Expr::Operand(Operand::Identifier("active".to_string()))
    );
    assert_eq!(parse("42"), Expr::Operand(Operand::Literal(Literal::Number(42.0))));

    let expr = parse("active AND age > 30");
    assert!(!expr.is_evaluable());
}

#[test]
fn test_bare_operand_strict() {
    let err = create_rule_with_mode("age > 30 OR vip", ParseMode::Strict).unwrap_err();
    assert_eq!(
        err,
        RuleError::Parse(ParseError::BareOperand {
            operand: "vip".to_string()
        })
    );

    assert!(create_rule_with_mode("age > 30 OR vip = 1", ParseMode::Strict).is_ok());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_double_greater_than() {
    assert!(matches!(
        parse_err("age >> 30"),
        ParseError::UnexpectedToken { position: 5, .. }
    ));
}

#[test]
fn test_trailing_tokens() {
    let err = parse_err("age > 30 age");
    assert_eq!(
        err,
        ParseError::TrailingTokens {
            found: "'age' of type IDENTIFIER".to_string(),
            position: 9
        }
    );
    assert!(err.to_string().starts_with("Unexpected tokens at the end of expression"));
}

#[test]
fn test_unclosed_paren() {
    assert_eq!(
        parse_err("(age > 30 AND x = 1"),
        ParseError::UnclosedParen { position: 0 }
    );
}

#[test]
fn test_unmatched_paren() {
    assert_eq!(
        parse_err("age > 30)"),
        ParseError::UnmatchedParen { position: 8 }
    );
}

#[test]
fn test_unexpected_leading_token() {
    assert!(matches!(
        parse_err("AND age > 30"),
        ParseError::UnexpectedToken { position: 0, .. }
    ));
    assert!(matches!(parse_err(") x"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_unexpected_eof() {
    assert_eq!(parse_err("age >"), ParseError::UnexpectedEof);
    assert_eq!(parse_err("age > 30 AND"), ParseError::UnexpectedEof);
    assert_eq!(parse_err("("), ParseError::UnexpectedEof);
}

#[test]
fn test_empty_input() {
    assert_eq!(parse_err(""), ParseError::EmptyInput);
    assert_eq!(parse_err("   "), ParseError::EmptyInput);
}

#[test]
fn test_left_side_must_be_identifier() {
    assert_eq!(parse_err("30 < age"), ParseError::NonIdentifierLhs);
    assert_eq!(parse_err("'age' > 30"), ParseError::NonIdentifierLhs);
    assert_eq!(parse_err("(a = 1) = 2"), ParseError::NonIdentifierLhs);
}

#[test]
fn test_right_side_must_be_literal() {
    assert_eq!(parse_err("age > (30)"), ParseError::NonLiteralRhs);
    assert_eq!(parse_err("age > (b = 1)"), ParseError::NonLiteralRhs);
}

#[test]
fn test_chained_comparison_is_trailing() {
    assert!(matches!(
        parse_err("a < b < c"),
        ParseError::TrailingTokens { .. }
    ));
}

#[test]
fn test_number_out_of_range() {
    let text = format!("x < 1{}", "0".repeat(400));
    assert_eq!(
        parse_err(&text),
        ParseError::NumberOutOfRange {
            found: format!("1{}", "0".repeat(400)),
            position: 4
        }
    );
}

#[test]
fn test_deep_nesting_rejected() {
    let text = format!("{}a = 1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(
        parse_err(&text),
        ParseError::TooDeep {
            position: MAX_NESTING
        }
    );

    let text = format!("{}a = 1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(parse(&text), leaf("a", CompareOp::Equal, 1.0));
}

#[test]
fn test_long_flat_chain() {
    let text = vec!["a = 1"; 5_000].join(" OR ");
    assert_eq!(parse(&text).leaf_count(), 5_000);
}

#[test]
fn test_lex_errors_pass_through() {
    assert!(matches!(create_rule("age ~ 3"), Err(RuleError::Lex(_))));
}

// ============================================================================
// Parser API
// ============================================================================

#[test]
fn test_parser_from_tokens() {
    let tokens = rule_lang::tokenize("x = 'y'").unwrap();
    let mut parser = Parser::from_tokens(tokens);
    assert_eq!(parser.token_count(), 3);
    assert_eq!(
        parser.parse().unwrap(),
        Expr::Compare(Comparison {
            field: "x".to_string(),
            op: CompareOp::Equal,
            value: Literal::Text("y".to_string()),
        })
    );
}

#[test]
fn test_display_reparses_to_same_tree() {
    let inputs = [
        "a = 1 OR b = 2 AND c = 3",
        "(a = 1 OR b = 2) AND c != 'x'",
        "name = \"it's\" AND score >= 0.25",
    ];
    for input in inputs {
        let expr = parse(input);
        assert_eq!(parse(&expr.to_string()), expr, "Failed for input: {}", input);
    }
}

#[test]
fn test_parse_mode_from_str() {
    assert_eq!("STRICT".parse::<ParseMode>(), Ok(ParseMode::Strict));
    assert_eq!("lenient".parse::<ParseMode>(), Ok(ParseMode::Lenient));
    assert!("loose".parse::<ParseMode>().is_err());
}
