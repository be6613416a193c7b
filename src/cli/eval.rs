//! Evaluate a JSON record against one or more rules

use serde_json::json;

use super::{CliError, json_to_record, load_rules, parse_mode};
use crate::{LogicalOp, RuleError, combine_all, evaluate};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Rule texts
    pub rules: Vec<String>,
    /// Canonical AST documents
    pub asts: Vec<String>,
    /// Operator folding the rules together, `AND` or `OR`, any case
    pub operator: String,
    /// JSON record
    pub input: Option<String>,
    /// Reject operands that are not part of a comparison
    pub strict: bool,
}

/// Combine the rules and evaluate the record, returning `{"eligible": bool}`
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let op: LogicalOp = options.operator.parse().map_err(RuleError::from)?;
    let mode = parse_mode(options.strict);

    let trees = load_rules(&options.rules, &options.asts, mode)?;
    let combined = combine_all(trees, op).ok_or(CliError::NoRules)?;

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let record = json_to_record(serde_json::from_str(json_str)?)?;

    let eligible = evaluate(&combined, &record)?;
    Ok(json!({ "eligible": eligible }))
}
