//! CLI support for rule-lang
//!
//! Provides programmatic access to the `rule` command's functionality so
//! other tools can embed it.

mod check;
mod combine;
mod convert;
mod eval;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use combine::{CombineOptions, execute_combine};
pub use convert::json_to_record;
pub use eval::{EvalOptions, execute_eval};

use std::io;

use crate::{ParseMode, RuleError, ast::Expr, create_rule_with_mode, evaluator::EvalError};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Rule could not be created, combined or evaluated
    #[error("{0}")]
    Rule(#[from] RuleError),

    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Record was not a JSON object
    #[error("Input must be a JSON object mapping field names to values")]
    NotAnObject,

    /// Record field held an array or object
    #[error("Field '{0}' must be a number, string, boolean or null")]
    UnsupportedValue(String),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// Neither --rule nor --ast given
    #[error("At least one --rule or --ast is required")]
    NoRules,
}

impl From<EvalError> for CliError {
    fn from(e: EvalError) -> Self {
        CliError::Rule(RuleError::Eval(e))
    }
}

fn parse_mode(strict: bool) -> ParseMode {
    if strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    }
}

/// Parses rule texts, then decodes canonical AST documents, in that order.
fn load_rules(rules: &[String], asts: &[String], mode: ParseMode) -> Result<Vec<Expr>, CliError> {
    let mut trees = Vec::with_capacity(rules.len() + asts.len());

    for text in rules {
        trees.push(create_rule_with_mode(text, mode)?);
    }
    for document in asts {
        let json: serde_json::Value = serde_json::from_str(document)?;
        trees.push(Expr::from_canonical(&json)?);
    }

    if trees.is_empty() {
        return Err(CliError::NoRules);
    }
    Ok(trees)
}
