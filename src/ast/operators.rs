use std::{fmt, str::FromStr};

use crate::combine::InvalidOperatorError;

/// Comparison operators allowed in a rule leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Greater than (`>`)
    GreaterThan,
    /// Less than (`<`)
    LessThan,
    /// Equal (`=`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::GreaterThan,
        CompareOp::LessThan,
        CompareOp::Equal,
        CompareOp::NotEqual,
        CompareOp::GreaterEqual,
        CompareOp::LessEqual,
    ];

    /// The operator's symbol, as written in rule text and in the canonical form.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::GreaterThan => ">",
            CompareOp::LessThan => "<",
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::GreaterEqual => ">=",
            CompareOp::LessEqual => "<=",
        }
    }

    /// Looks up an operator by symbol. Returns `None` for anything else.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        CompareOp::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical operators joining two rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicalOp {
    /// Logical AND
    And,
    /// Logical OR
    #[default]
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }

    /// Applies the operator to two already-evaluated operands.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicalOp::And => left && right,
            LogicalOp::Or => left || right,
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"and"`, `"And"` and `"AND"` all parse to [`LogicalOp::And`].
impl FromStr for LogicalOp {
    type Err = InvalidOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(LogicalOp::And),
            "OR" => Ok(LogicalOp::Or),
            _ => Err(InvalidOperatorError {
                operator: s.to_string(),
            }),
        }
    }
}
