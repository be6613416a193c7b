use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::ast::CompareOp;

/// A literal on the right-hand side of a comparison.
///
/// Serializes untagged: a JSON number or a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(f64::from(n))
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n as f64)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

/// A value in the record being evaluated.
///
/// Records usually come from JSON, so booleans and null are representable
/// even though rule literals are only numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

/// The record a rule is evaluated against: field name to value.
/// Fields absent from the map are "missing".
pub type Record = HashMap<String, Value>;

impl Value {
    /// Numeric view used by the coercion rules. Booleans count as 1 and 0;
    /// strings count only when their trimmed text parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => parse_numeric(s),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(n),
            Literal::Text(s) => Value::String(s),
        }
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Compares a record value (or a missing one) against a rule literal.
///
/// Coercion policy:
///
/// 1. Missing values (absent field or `null`): `=` is false, `!=` is true,
///    every ordering comparison is false.
/// 2. Record strings against text literals: `=`/`!=` compare exactly,
///    ordering is byte-wise lexicographic.
/// 3. Anything else is compared numerically when both sides have a numeric
///    view (see [`Value::as_number`]), so `"5" = 5` and `true = 1` hold.
/// 4. When one side has no numeric view the two are unordered: `!=` is true,
///    everything else is false.
///
/// NaN is unordered against everything, including itself.
pub fn compare(actual: Option<&Value>, op: CompareOp, expected: &Literal) -> bool {
    let actual = match actual {
        Some(value) if !value.is_null() => value,
        _ => return op == CompareOp::NotEqual,
    };

    let ordering = match (actual, expected) {
        (Value::String(a), Literal::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (a, b) => {
            let b = match b {
                Literal::Number(n) => Some(*n),
                Literal::Text(s) => parse_numeric(s),
            };
            match (a.as_number(), b) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            }
        }
    };

    match ordering {
        Some(ordering) => apply(op, ordering),
        None => op == CompareOp::NotEqual,
    }
}

fn apply(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Equal => ordering == Ordering::Equal,
        CompareOp::NotEqual => ordering != Ordering::Equal,
        CompareOp::GreaterThan => ordering == Ordering::Greater,
        CompareOp::LessThan => ordering == Ordering::Less,
        CompareOp::GreaterEqual => ordering != Ordering::Less,
        CompareOp::LessEqual => ordering != Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value() {
        let expected = Literal::Number(5.0);
        assert!(!compare(None, CompareOp::Equal, &expected));
        assert!(compare(None, CompareOp::NotEqual, &expected));
        assert!(!compare(None, CompareOp::GreaterThan, &expected));
        assert!(!compare(None, CompareOp::LessEqual, &expected));
        assert!(compare(Some(&Value::Null), CompareOp::NotEqual, &expected));
    }

    #[test]
    fn test_numeric_string_coercion() {
        let five = Value::from("5");
        assert!(compare(Some(&five), CompareOp::Equal, &Literal::Number(5.0)));
        assert!(compare(Some(&five), CompareOp::GreaterThan, &Literal::Number(4.5)));
        assert!(compare(Some(&Value::from(5.0)), CompareOp::Equal, &Literal::from(" 5 ")));
    }

    #[test]
    fn test_non_numeric_string_against_number() {
        let name = Value::from("Alice");
        assert!(!compare(Some(&name), CompareOp::Equal, &Literal::Number(1.0)));
        assert!(compare(Some(&name), CompareOp::NotEqual, &Literal::Number(1.0)));
        assert!(!compare(Some(&name), CompareOp::LessThan, &Literal::Number(1.0)));
        assert!(!compare(Some(&name), CompareOp::GreaterEqual, &Literal::Number(1.0)));
    }

    #[test]
    fn test_string_ordering() {
        let b = Value::from("b");
        assert!(compare(Some(&b), CompareOp::GreaterThan, &Literal::from("a")));
        assert!(compare(Some(&b), CompareOp::LessThan, &Literal::from("c")));
        assert!(!compare(Some(&Value::from("10")), CompareOp::GreaterThan, &Literal::from("9")));
    }

    #[test]
    fn test_boolean_counts_as_number() {
        let yes = Value::Boolean(true);
        assert!(compare(Some(&yes), CompareOp::Equal, &Literal::Number(1.0)));
        assert!(!compare(Some(&yes), CompareOp::Equal, &Literal::from("true")));
    }
}
