pub mod ast;
pub mod cli;
pub mod combine;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod rule;
pub mod value;

pub use ast::{CompareOp, Comparison, Expr, LogicalOp, Operand, Token, TokenKind};
pub use combine::{InvalidOperatorError, combine, combine_all, combine_rules};
pub use config::EngineConfig;
pub use engine::{RuleError, create_rule, create_rule_with_mode, evaluate, evaluate_canonical};
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{MAX_NESTING, ParseError, ParseMode, Parser};
pub use rule::{Rule, RuleSet, RuleSetError};
pub use value::{Literal, Record, Value};
