use tracing::trace;

use crate::{
    ast::{Comparison, Expr, LogicalOp},
    value::{Record, compare},
};

/// Errors that can occur while evaluating a rule, or while decoding one from
/// its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Node `type` tag other than `operand` / `operator`
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Comparison operator outside the six supported ones
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Logical operator other than AND / OR
    #[error("Unsupported logical operator: {0}")]
    UnsupportedLogicalOperator(String),

    /// Node is missing a member or has one of the wrong shape
    #[error("Malformed node: {0}")]
    MalformedNode(String),

    /// Operand that is not part of a comparison has no truth value
    #[error("Operand '{0}' is not a comparison and cannot be evaluated")]
    BareOperand(String),
}

/// Tree-walking rule evaluator.
///
/// Both children of a logical node are always evaluated, even when the left
/// one already decides the result. The evaluator counts every leaf it visits.
#[derive(Debug, Default)]
pub struct Evaluator {
    leaves_visited: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves (comparisons and bare operands) visited since construction.
    pub fn leaves_visited(&self) -> usize {
        self.leaves_visited
    }

    /// Evaluates `expr` against `record`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rule_lang::{Evaluator, Record, Value, create_rule};
    ///
    /// let rule = create_rule("age > 30 AND department = 'Sales'").unwrap();
    /// let record = Record::from([
    ///     ("age".to_string(), Value::from(35)),
    ///     ("department".to_string(), Value::from("Sales")),
    /// ]);
    ///
    /// let mut evaluator = Evaluator::new();
    /// assert!(evaluator.evaluate(&rule, &record).unwrap());
    /// assert_eq!(evaluator.leaves_visited(), 2);
    /// ```
    pub fn evaluate(&mut self, expr: &Expr, record: &Record) -> Result<bool, EvalError> {
        // Post-order walk on an explicit stack. Both sides of every logical
        // node are visited even when the left one already failed or decided
        // the result; the left error wins.
        let mut pending = vec![Step::Visit(expr)];
        let mut results: Vec<Result<bool, EvalError>> = Vec::new();

        while let Some(step) = pending.pop() {
            match step {
                Step::Visit(Expr::Compare(comparison)) => {
                    self.leaves_visited += 1;
                    results.push(Ok(self.eval_comparison(comparison, record)));
                }
                Step::Visit(node @ Expr::Operand(_)) => {
                    self.leaves_visited += 1;
                    results.push(Err(EvalError::BareOperand(node.to_string())));
                }
                Step::Visit(Expr::Logical { op, left, right }) => {
                    pending.push(Step::Apply(*op));
                    pending.push(Step::Visit(&**right));
                    pending.push(Step::Visit(&**left));
                }
                Step::Apply(op) => {
                    let right = results.pop();
                    let left = results.pop();
                    results.push(match (left, right) {
                        (Some(left), Some(right)) => {
                            left.and_then(|l| right.map(|r| op.apply(l, r)))
                        }
                        _ => Err(missing_operand()),
                    });
                }
            }
        }

        results.pop().unwrap_or_else(|| Err(missing_operand()))
    }

    /// Decodes an untrusted canonical tree, then evaluates it.
    pub fn evaluate_canonical(
        &mut self,
        ast: &serde_json::Value,
        record: &Record,
    ) -> Result<bool, EvalError> {
        let expr = Expr::from_canonical(ast)?;
        self.evaluate(&expr, record)
    }

    fn eval_comparison(&self, comparison: &Comparison, record: &Record) -> bool {
        let Comparison { field, op, value } = comparison;
        let result = compare(record.get(field), *op, value);
        trace!(field = %field, op = %op, result, "comparison evaluated");
        result
    }
}

enum Step<'a> {
    Visit(&'a Expr),
    Apply(LogicalOp),
}

fn missing_operand() -> EvalError {
    EvalError::MalformedNode("logical node without two operands".to_string())
}
