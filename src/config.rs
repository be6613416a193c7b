//! Engine configuration.

use std::env;

use tracing::warn;

use crate::{ast::LogicalOp, parser::ParseMode};

/// Rule engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How bare operands are treated when parsing (default: lenient).
    pub parse_mode: ParseMode,
    /// Operator used to fold several rules before evaluation (default: OR).
    pub combine_operator: LogicalOp,
    /// Log filter directive (default: `info`).
    pub log_level: String,
}

const PARSE_MODE_VAR: &str = "RULE_PARSE_MODE";
const COMBINE_OPERATOR_VAR: &str = "RULE_COMBINE_OPERATOR";
const LOG_LEVEL_VAR: &str = "RULE_LOG";

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// - `RULE_PARSE_MODE`: `strict` or `lenient`
    /// - `RULE_COMBINE_OPERATOR`: `and` or `or`
    /// - `RULE_LOG`: log filter directive
    ///
    /// Unparseable values fall back to the default with a warning, so install
    /// the tracing subscriber first (see [`EngineConfig::log_level_from_env`]).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            parse_mode: parse_or_default(&lookup, PARSE_MODE_VAR, defaults.parse_mode),
            combine_operator: parse_or_default(&lookup, COMBINE_OPERATOR_VAR, defaults.combine_operator),
            log_level: lookup(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
        }
    }

    /// Just the log filter directive, for setting up logging before the rest
    /// of the configuration is read.
    #[must_use]
    pub fn log_level_from_env() -> String {
        env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| Self::default().log_level)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
            combine_operator: LogicalOp::Or,
            log_level: "info".to_owned(),
        }
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "ignoring invalid configuration value");
            default
        }),
        None => default,
    }
}
