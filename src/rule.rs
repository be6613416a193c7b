//! Named rules and an in-memory catalog of them.
//!
//! A [`Rule`] is the record a storage layer persists: its name, the source
//! text, and the tree parsed from that text. [`RuleSet`] keeps rules by
//! unique name and answers eligibility queries against a selection of them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ast::{Expr, LogicalOp},
    combine::combine_all,
    config::EngineConfig,
    engine::{RuleError, create_rule_with_mode, evaluate},
    parser::ParseMode,
    value::Record,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSetError {
    #[error("Name must be a non-empty string.")]
    EmptyName,

    #[error("Expression must be a non-empty string.")]
    EmptyExpression,

    #[error("Rule with this name already exists: {0}")]
    Duplicate(String),

    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("At least one rule is required")]
    NoRules,

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// A named rule with its source text and parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub expression: String,
    pub ast: Expr,
}

impl Rule {
    /// Validates the name and parses the expression.
    pub fn new(name: &str, expression: &str, mode: ParseMode) -> Result<Self, RuleSetError> {
        if name.trim().is_empty() {
            return Err(RuleSetError::EmptyName);
        }
        if expression.trim().is_empty() {
            return Err(RuleSetError::EmptyExpression);
        }
        let ast = create_rule_with_mode(expression, mode)?;
        Ok(Rule {
            name: name.to_string(),
            expression: expression.to_string(),
            ast,
        })
    }

    /// Replaces the source text and re-parses it. On failure the rule is
    /// left unchanged.
    pub fn set_expression(&mut self, expression: &str, mode: ParseMode) -> Result<(), RuleSetError> {
        if expression.trim().is_empty() {
            return Err(RuleSetError::EmptyExpression);
        }
        self.ast = create_rule_with_mode(expression, mode)?;
        self.expression = expression.to_string();
        Ok(())
    }
}

/// In-memory rule catalog keyed by unique name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    config: EngineConfig,
}

impl RuleSet {
    pub fn new(config: EngineConfig) -> Self {
        RuleSet {
            rules: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    fn index_of(&self, name: &str) -> Result<usize, RuleSetError> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .ok_or_else(|| RuleSetError::NotFound(name.to_string()))
    }

    /// Parses and stores a new rule. Nothing is stored if parsing fails.
    pub fn insert(&mut self, name: &str, expression: &str) -> Result<&Rule, RuleSetError> {
        if self.get(name).is_some() {
            return Err(RuleSetError::Duplicate(name.to_string()));
        }
        let rule = Rule::new(name, expression, self.config.parse_mode)?;
        debug!(name, leaves = rule.ast.leaf_count(), "rule stored");
        self.rules.push(rule);
        Ok(&self.rules[self.rules.len() - 1])
    }

    /// Renames a rule and/or replaces its expression. Either change is
    /// skipped when `None`; the rule is untouched if any step fails.
    pub fn update(
        &mut self,
        name: &str,
        new_name: Option<&str>,
        expression: Option<&str>,
    ) -> Result<&Rule, RuleSetError> {
        let index = self.index_of(name)?;
        let mut rule = self.rules[index].clone();

        if let Some(new_name) = new_name.filter(|n| *n != name) {
            if new_name.trim().is_empty() {
                return Err(RuleSetError::EmptyName);
            }
            if self.get(new_name).is_some() {
                return Err(RuleSetError::Duplicate(new_name.to_string()));
            }
            rule.name = new_name.to_string();
        }
        if let Some(expression) = expression {
            rule.set_expression(expression, self.config.parse_mode)?;
        }

        debug!(name, new_name = %rule.name, "rule updated");
        self.rules[index] = rule;
        Ok(&self.rules[index])
    }

    pub fn remove(&mut self, name: &str) -> Result<Rule, RuleSetError> {
        let index = self.index_of(name)?;
        debug!(name, "rule removed");
        Ok(self.rules.remove(index))
    }

    /// Folds the named rules, in the order given, with the configured
    /// combine operator. Every name must exist.
    pub fn combined(&self, names: &[&str]) -> Result<Expr, RuleSetError> {
        self.combined_with(names, self.config.combine_operator)
    }

    pub fn combined_with(&self, names: &[&str], op: LogicalOp) -> Result<Expr, RuleSetError> {
        let trees = names
            .iter()
            .map(|name| {
                self.get(name)
                    .map(|rule| rule.ast.clone())
                    .ok_or_else(|| RuleSetError::NotFound((*name).to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        combine_all(trees, op).ok_or(RuleSetError::NoRules)
    }

    /// Answers an eligibility query: combines the named rules and evaluates
    /// the result against `record`.
    pub fn evaluate(&self, names: &[&str], record: &Record) -> Result<bool, RuleSetError> {
        let combined = self.combined(names)?;
        evaluate(&combined, record)
            .map_err(RuleError::from)
            .map_err(RuleSetError::from)
    }
}
