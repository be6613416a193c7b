use std::fmt;

use crate::{
    ast::{CompareOp, LogicalOp},
    value::Literal,
};

/// A comparison leaf: one field tested against one literal.
///
/// # Example
/// ```text
/// age > 30
/// department = 'Sales'
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Name of the field looked up in the evaluated record
    pub field: String,
    pub op: CompareOp,
    pub value: Literal,
}

/// An operand that was parsed without a comparison operator after it.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bare field name, e.g. `active`
    Identifier(String),
    /// Bare literal, e.g. `42` or `'x'`
    Literal(Literal),
}

/// Abstract Syntax Tree node of a rule.
///
/// Rules are strict trees: every node owns its children. A tree is never
/// mutated after construction; combining two rules builds a new root over the
/// two existing trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Comparison leaf (`field op value`)
    Compare(Comparison),

    /// Logical combination (`left AND right`, `left OR right`)
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Operand with no comparison.
    ///
    /// Only produced by the parser in lenient mode. It has no truth value, so
    /// evaluating a tree that contains one fails.
    Operand(Operand),
}

impl Expr {
    /// Builds a comparison leaf.
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Literal>) -> Self {
        Expr::Compare(Comparison {
            field: field.into(),
            op,
            value: value.into(),
        })
    }

    /// Builds a logical node over two subtrees.
    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        Expr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of leaves (comparisons and bare operands) in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Returns true when the tree contains no bare operands, i.e. every
    /// leaf is a comparison and the whole tree can be evaluated.
    pub fn is_evaluable(&self) -> bool {
        self.leaves().all(|leaf| matches!(leaf, Expr::Compare(_)))
    }

    /// Leaves in left-to-right order.
    fn leaves(&self) -> impl Iterator<Item = &Expr> {
        let mut pending = vec![self];
        std::iter::from_fn(move || {
            while let Some(node) = pending.pop() {
                match node {
                    Expr::Logical { left, right, .. } => {
                        pending.push(&**right);
                        pending.push(&**left);
                    }
                    leaf => return Some(leaf),
                }
            }
            None
        })
    }
}

/// Drops without recursion: trees folded from many rules can be deeper than
/// the call stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let Expr::Logical { left, right, .. } = self else {
            return;
        };
        if !left.is_logical() && !right.is_logical() {
            return;
        }

        let mut pending = vec![take(left), take(right)];
        while let Some(mut node) = pending.pop() {
            if let Expr::Logical { left, right, .. } = &mut node {
                pending.push(take(left));
                pending.push(take(right));
            }
        }
    }
}

impl Expr {
    fn is_logical(&self) -> bool {
        matches!(self, Expr::Logical { .. })
    }
}

fn take(slot: &mut Expr) -> Expr {
    std::mem::replace(slot, Expr::Operand(Operand::Identifier(String::new())))
}

fn write_literal(f: &mut fmt::Formatter<'_>, literal: &Literal) -> fmt::Result {
    match literal {
        Literal::Number(n) => write!(f, "{n}"),
        // No escapes in the language, so pick the quote the text doesn't use.
        Literal::Text(s) if s.contains('\'') => write!(f, "\"{s}\""),
        Literal::Text(s) => write!(f, "'{s}'"),
    }
}

/// Renders the tree back to rule text. Logical nodes are always wrapped in
/// parentheses, so the output re-parses to the same tree regardless of
/// precedence.
///
/// The language has no escapes, so a text literal holding both `'` and `"`
/// has no rule text form. The parser and [`Expr::from_canonical`] never
/// produce one; a tree built by hand with such a literal renders text that
/// does not parse.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare(Comparison { field, op, value }) => {
                write!(f, "{field} {op} ")?;
                write_literal(f, value)
            }
            Expr::Logical { op, left, right } => write!(f, "({left} {op} {right})"),
            Expr::Operand(Operand::Identifier(name)) => f.write_str(name),
            Expr::Operand(Operand::Literal(literal)) => write_literal(f, literal),
        }
    }
}
