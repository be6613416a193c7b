//! # Rule Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the rule language,
//! a small boolean expression language used to decide whether a record of
//! named values is eligible under a set of conditions.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison and logical operators
//! - **[expressions]** - Tree nodes (comparison leaves, logical nodes)
//! - **[canonical]** - The JSON form rules are stored and transmitted in
//!
//! ## Quick Start
//!
//! ```text
//! (age > 30 AND department = 'Sales') OR experience >= 5
//! ```
//!
//! This rule matches senior sales staff, or anyone with five years of experience.
//!
//! ## Core Concepts
//!
//! ### Two Node Shapes
//!
//! - **Comparison** `field op literal` - tests one field against a number or string
//! - **Logical** `left AND right`, `left OR right` - joins two subtrees
//!
//! ### Precedence
//!
//! `AND` binds tighter than `OR`, and both are left-associative:
//!
//! ```text
//! a = 1 OR b = 2 AND c = 3   is   a = 1 OR (b = 2 AND c = 3)
//! a = 1 OR b = 2 OR c = 3    is   (a = 1 OR b = 2) OR c = 3
//! ```
//!
//! Parentheses override precedence.
pub mod canonical;
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Comparison, Expr, Operand};
pub use operators::{CompareOp, LogicalOp};
pub use tokens::{Token, TokenKind};
