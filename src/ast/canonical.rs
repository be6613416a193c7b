//! Canonical JSON form of a rule tree.
//!
//! This is the shape rules are stored and transmitted in:
//!
//! ```text
//! {"type": "operand", "operand": {"field": "age", "op": ">", "value": 30}}
//! {"type": "operator", "operator": "AND", "left": {...}, "right": {...}}
//! ```
//!
//! Bare operands (lenient parse mode only) are written as
//! `{"type": "operand", "operand": {"identifier": "name"}}` or
//! `{"type": "operand", "operand": {"value": 42}}`.
//!
//! Decoding treats its input as untrusted: unknown node types, unknown
//! operators and malformed members are reported as [`EvalError`]s.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_json::{Map, Value as Json, json};

use crate::{
    ast::{CompareOp, Comparison, Expr, LogicalOp, Operand},
    evaluator::EvalError,
    value::Literal,
};

impl Expr {
    /// Converts the tree to its canonical JSON form.
    pub fn to_canonical(&self) -> Json {
        match self {
            Expr::Compare(Comparison { field, op, value }) => json!({
                "type": "operand",
                "operand": {
                    "field": field,
                    "op": op.symbol(),
                    "value": literal_to_json(value),
                },
            }),
            Expr::Logical { op, left, right } => json!({
                "type": "operator",
                "operator": op.as_str(),
                "left": left.to_canonical(),
                "right": right.to_canonical(),
            }),
            Expr::Operand(Operand::Identifier(name)) => json!({
                "type": "operand",
                "operand": { "identifier": name },
            }),
            Expr::Operand(Operand::Literal(literal)) => json!({
                "type": "operand",
                "operand": { "value": literal_to_json(literal) },
            }),
        }
    }

    /// Rebuilds a tree from its canonical JSON form.
    pub fn from_canonical(value: &Json) -> Result<Expr, EvalError> {
        let node = value
            .as_object()
            .ok_or_else(|| EvalError::MalformedNode("node must be an object".to_string()))?;

        match node.get("type").and_then(Json::as_str) {
            Some("operand") => {
                let operand = member(node, "operand")?.as_object().ok_or_else(|| {
                    EvalError::MalformedNode("'operand' must be an object".to_string())
                })?;
                decode_operand(operand)
            }
            Some("operator") => {
                let name = member(node, "operator")?
                    .as_str()
                    .ok_or_else(|| EvalError::MalformedNode("'operator' must be a string".to_string()))?;
                let op = match name {
                    "AND" => LogicalOp::And,
                    "OR" => LogicalOp::Or,
                    other => return Err(EvalError::UnsupportedLogicalOperator(other.to_string())),
                };
                let left = Expr::from_canonical(member(node, "left")?)?;
                let right = Expr::from_canonical(member(node, "right")?)?;
                Ok(Expr::logical(op, left, right))
            }
            Some(other) => Err(EvalError::UnknownNodeType(other.to_string())),
            None => Err(EvalError::UnknownNodeType(
                node.get("type").map_or_else(|| "<missing>".to_string(), Json::to_string),
            )),
        }
    }
}

fn member<'a>(node: &'a Map<String, Json>, key: &str) -> Result<&'a Json, EvalError> {
    node.get(key)
        .ok_or_else(|| EvalError::MalformedNode(format!("missing '{key}'")))
}

fn decode_operand(operand: &Map<String, Json>) -> Result<Expr, EvalError> {
    if let Some(field) = operand.get("field") {
        let field = field
            .as_str()
            .filter(|f| is_identifier(f))
            .ok_or_else(|| EvalError::MalformedNode(format!("invalid field name {field}")))?;
        let symbol = member(operand, "op")?
            .as_str()
            .ok_or_else(|| EvalError::MalformedNode("'op' must be a string".to_string()))?;
        let op = CompareOp::from_symbol(symbol)
            .ok_or_else(|| EvalError::UnsupportedOperator(symbol.to_string()))?;
        let value = json_to_literal(member(operand, "value")?)?;
        return Ok(Expr::compare(field, op, value));
    }

    if let Some(name) = operand.get("identifier") {
        let name = name
            .as_str()
            .filter(|n| is_identifier(n))
            .ok_or_else(|| EvalError::MalformedNode(format!("invalid identifier {name}")))?;
        return Ok(Expr::Operand(Operand::Identifier(name.to_string())));
    }

    let value = json_to_literal(member(operand, "value")?)?;
    Ok(Expr::Operand(Operand::Literal(value)))
}

fn literal_to_json(literal: &Literal) -> Json {
    match literal {
        Literal::Number(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
        Literal::Text(s) => Json::String(s.clone()),
    }
}

fn json_to_literal(value: &Json) -> Result<Literal, EvalError> {
    match value {
        Json::Number(n) => n
            .as_f64()
            .map(Literal::Number)
            .ok_or_else(|| EvalError::MalformedNode(format!("unrepresentable number {n}"))),
        // No escapes in rule text: at most one quote kind per literal.
        Json::String(s) if s.contains('\'') && s.contains('"') => Err(EvalError::MalformedNode(
            format!("text literal {value} uses both quote characters"),
        )),
        Json::String(s) => Ok(Literal::Text(s.clone())),
        other => Err(EvalError::MalformedNode(format!(
            "literal must be a number or string, got {other}"
        ))),
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_canonical().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        Expr::from_canonical(&value).map_err(D::Error::custom)
    }
}
