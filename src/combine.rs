//! Joining existing rules under a logical operator without re-parsing.

use tracing::debug;

use crate::ast::{Expr, LogicalOp};

/// Combine was asked for an operator other than AND / OR.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid combine operator '{operator}'. Use one of: AND, OR")]
pub struct InvalidOperatorError {
    pub operator: String,
}

/// Builds a new logical node with `left` and `right` as its children.
///
/// Chaining nests to the left in call order:
/// `combine(combine(a, b, Or), c, And)` is `(a OR b) AND c`.
pub fn combine(left: Expr, right: Expr, op: LogicalOp) -> Expr {
    debug!(op = %op, "combining rules");
    Expr::logical(op, left, right)
}

/// Like [`combine`], with the operator given as text (`"and"`, `"OR"`, ...).
pub fn combine_rules(left: Expr, right: Expr, operator: &str) -> Result<Expr, InvalidOperatorError> {
    let op = operator.parse::<LogicalOp>()?;
    Ok(combine(left, right, op))
}

/// Folds several rules into one, left to right. `None` when `rules` is empty.
///
/// ```
/// use rule_lang::{LogicalOp, combine_all, create_rule};
///
/// let rules = ["a = 1", "b = 2", "c = 3"].map(|text| create_rule(text).unwrap());
/// let combined = combine_all(rules, LogicalOp::Or).unwrap();
/// assert_eq!(combined.to_string(), "((a = 1 OR b = 2) OR c = 3)");
/// ```
pub fn combine_all<I>(rules: I, op: LogicalOp) -> Option<Expr>
where
    I: IntoIterator<Item = Expr>,
{
    rules
        .into_iter()
        .reduce(|combined, next| combine(combined, next, op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;

    #[test]
    fn test_operator_is_case_insensitive() {
        let left = Expr::compare("age", CompareOp::GreaterThan, 30.0);
        let right = Expr::compare("age", CompareOp::LessThan, 25.0);

        let combined = combine_rules(left.clone(), right.clone(), "or").unwrap();
        assert_eq!(combined, Expr::logical(LogicalOp::Or, left, right));
    }

    #[test]
    fn test_invalid_operator() {
        let leaf = Expr::compare("age", CompareOp::GreaterThan, 30.0);
        let err = combine_rules(leaf.clone(), leaf, "XOR").unwrap_err();
        assert_eq!(err.operator, "XOR");
    }

    #[test]
    fn test_combine_all_empty() {
        assert_eq!(combine_all(Vec::new(), LogicalOp::And), None);
    }
}
