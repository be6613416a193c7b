//! Validate a rule and show its tree

use super::{CliError, parse_mode};
use crate::create_rule_with_mode;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The rule text to check
    pub rule: String,
    /// Reject operands that are not part of a comparison
    pub strict: bool,
    /// Only validate syntax, don't print the tree
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// The rule's canonical tree
    Ast(serde_json::Value),
}

/// Execute a rule check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let mode = parse_mode(options.strict);

    let expr = create_rule_with_mode(&options.rule, mode)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }
    Ok(CheckResult::Ast(expr.to_canonical()))
}
