//! Combine several rules into one tree

use super::{CliError, load_rules, parse_mode};
use crate::{LogicalOp, RuleError, combine_all};

/// Options for the combine command
#[derive(Debug, Clone, Default)]
pub struct CombineOptions {
    /// Rule texts
    pub rules: Vec<String>,
    /// Canonical AST documents
    pub asts: Vec<String>,
    /// `AND` or `OR`, any case
    pub operator: String,
    /// Reject operands that are not part of a comparison
    pub strict: bool,
}

/// Parse, combine and return the combined canonical tree
pub fn execute_combine(options: &CombineOptions) -> Result<serde_json::Value, CliError> {
    let op: LogicalOp = options.operator.parse().map_err(RuleError::from)?;
    let mode = parse_mode(options.strict);

    let trees = load_rules(&options.rules, &options.asts, mode)?;
    let combined = combine_all(trees, op).ok_or(CliError::NoRules)?;
    Ok(combined.to_canonical())
}
