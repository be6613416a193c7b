//! Entry points used by the storage and request-handling layers.

use tracing::debug;

use crate::{
    ast::Expr,
    combine::InvalidOperatorError,
    evaluator::{EvalError, Evaluator},
    lexer::LexError,
    parser::{ParseError, ParseMode, Parser},
    value::Record,
};

/// Any failure of a rule-engine call. Each call either fully succeeds or
/// fails with exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Failed to create rule: {0}")]
    Lex(#[from] LexError),

    #[error("Failed to create rule: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    InvalidOperator(#[from] InvalidOperatorError),

    #[error("Failed to evaluate rule: {0}")]
    Eval(#[from] EvalError),
}

/// Parses rule text into a tree in lenient mode.
///
/// ```
/// use rule_lang::create_rule;
///
/// let rule = create_rule("age > 30 AND department = 'Sales'").unwrap();
/// assert_eq!(rule.to_string(), "(age > 30 AND department = 'Sales')");
///
/// assert!(create_rule("age >> 30").is_err());
/// ```
pub fn create_rule(text: &str) -> Result<Expr, RuleError> {
    create_rule_with_mode(text, ParseMode::Lenient)
}

/// Parses rule text into a tree using the given [`ParseMode`].
pub fn create_rule_with_mode(text: &str, mode: ParseMode) -> Result<Expr, RuleError> {
    let mut parser = Parser::new(text)?.with_mode(mode);
    let tokens = parser.token_count();
    let expr = parser.parse()?;
    debug!(tokens, leaves = expr.leaf_count(), ?mode, "rule created");
    Ok(expr)
}

/// Evaluates a tree against a record.
pub fn evaluate(expr: &Expr, record: &Record) -> Result<bool, EvalError> {
    let mut evaluator = Evaluator::new();
    let result = evaluator.evaluate(expr, record);
    debug!(leaves = evaluator.leaves_visited(), ?result, "rule evaluated");
    result
}

/// Decodes a tree from its canonical JSON form and evaluates it.
pub fn evaluate_canonical(ast: &serde_json::Value, record: &Record) -> Result<bool, EvalError> {
    let mut evaluator = Evaluator::new();
    let result = evaluator.evaluate_canonical(ast, record);
    debug!(leaves = evaluator.leaves_visited(), ?result, "canonical rule evaluated");
    result
}
