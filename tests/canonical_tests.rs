use rule_lang::{EvalError, Expr, Record, RuleError, Value, create_rule, evaluate, evaluate_canonical};
use serde_json::json;

fn record(pairs: Vec<(&str, Value)>) -> Record {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn test_canonical_shape() {
    let ast = create_rule("age > 30 AND department = 'Sales'").unwrap();
    assert_eq!(
        ast.to_canonical(),
        json!({
            "type": "operator",
            "operator": "AND",
            "left": {
                "type": "operand",
                "operand": {"field": "age", "op": ">", "value": 30.0}
            },
            "right": {
                "type": "operand",
                "operand": {"field": "department", "op": "=", "value": "Sales"}
            }
        })
    );
}

#[test]
fn test_serde_uses_canonical_form() {
    let ast = create_rule("score <= 0.5").unwrap();
    let text = serde_json::to_string(&ast).unwrap();
    assert_eq!(
        text,
        r#"{"operand":{"field":"score","op":"<=","value":0.5},"type":"operand"}"#
    );
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_round_trip_preserves_tree_and_result() {
    let rules = [
        "age > 30 AND department = 'Sales'",
        "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)",
        "a != 'x' OR b >= 1.25 OR c <= 0",
        "flag",
    ];
    let data = record(vec![
        ("age", Value::from(35)),
        ("department", Value::from("Sales")),
        ("salary", Value::from(40000)),
        ("experience", Value::from(7)),
        ("a", Value::from("x")),
        ("b", Value::from(1.25)),
    ]);

    for rule in rules {
        let ast = create_rule(rule).unwrap();
        let stored = serde_json::to_string(&ast).unwrap();
        let restored: Expr = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, ast, "Failed for rule: {}", rule);
        assert_eq!(evaluate(&restored, &data), evaluate(&ast, &data));
    }
}

#[test]
fn test_large_numbers_round_trip() {
    let text = format!("x < 1{}", "0".repeat(300));
    let ast = create_rule(&text).unwrap();
    assert_eq!(Expr::from_canonical(&ast.to_canonical()), Ok(ast));
}

#[test]
fn test_integer_values_decode() {
    // Documents written by other tools may use integer JSON numbers.
    let stored = json!({
        "type": "operand",
        "operand": {"field": "age", "op": ">=", "value": 18}
    });
    let ast = Expr::from_canonical(&stored).unwrap();
    assert_eq!(ast, create_rule("age >= 18").unwrap());
}

// ============================================================================
// Untrusted Input
// ============================================================================

#[test]
fn test_unknown_node_type() {
    let stored = json!({"type": "negation", "inner": {}});
    assert_eq!(
        Expr::from_canonical(&stored),
        Err(EvalError::UnknownNodeType("negation".to_string()))
    );

    let missing = json!({"operand": {"field": "a", "op": "=", "value": 1}});
    assert!(matches!(
        Expr::from_canonical(&missing),
        Err(EvalError::UnknownNodeType(_))
    ));
}

#[test]
fn test_unsupported_comparison_operator() {
    let stored = json!({
        "type": "operand",
        "operand": {"field": "age", "op": "=~", "value": 1}
    });
    assert_eq!(
        evaluate_canonical(&stored, &Record::new()),
        Err(EvalError::UnsupportedOperator("=~".to_string()))
    );
}

#[test]
fn test_unsupported_logical_operator() {
    let leaf = json!({"type": "operand", "operand": {"field": "a", "op": "=", "value": 1}});
    let stored = json!({"type": "operator", "operator": "XOR", "left": leaf, "right": leaf});
    assert_eq!(
        evaluate_canonical(&stored, &Record::new()),
        Err(EvalError::UnsupportedLogicalOperator("XOR".to_string()))
    );
}

#[test]
fn test_malformed_nodes() {
    let cases = vec![
        json!("age > 3"),
        json!({"type": "operand"}),
        json!({"type": "operand", "operand": {"field": "age", "value": 1}}),
        json!({"type": "operand", "operand": {"field": "", "op": "=", "value": 1}}),
        json!({"type": "operand", "operand": {"field": "a b", "op": "=", "value": 1}}),
        json!({"type": "operand", "operand": {"field": "a", "op": "=", "value": [1]}}),
        json!({"type": "operand", "operand": {"field": "a", "op": "=", "value": null}}),
        json!({"type": "operand", "operand": {"field": "a", "op": "=", "value": "it's \"x\""}}),
        json!({"type": "operator", "operator": "AND", "left": {"type": "operand", "operand": {"field": "a", "op": "=", "value": 1}}}),
    ];

    for case in cases {
        assert!(
            matches!(Expr::from_canonical(&case), Err(EvalError::MalformedNode(_))),
            "Failed for: {}",
            case
        );
    }
}

#[test]
fn test_deserialize_error_message() {
    let err = serde_json::from_str::<Expr>(r#"{"type": "leaf"}"#).unwrap_err();
    assert!(err.to_string().contains("Unknown node type: leaf"));
}

#[test]
fn test_evaluate_canonical() {
    let stored = create_rule("age > 30 OR vip = 'yes'").unwrap().to_canonical();
    let data = record(vec![("age", Value::from(20)), ("vip", Value::from("yes"))]);
    assert_eq!(evaluate_canonical(&stored, &data), Ok(true));
}

#[test]
fn test_decode_error_is_an_eval_error() {
    let err: RuleError = Expr::from_canonical(&json!(42)).unwrap_err().into();
    assert!(matches!(err, RuleError::Eval(EvalError::MalformedNode(_))));
}
