use std::str::FromStr;

use crate::{
    ast::{CompareOp, Comparison, Expr, LogicalOp, Operand, Token, TokenKind},
    lexer::{LexError, tokenize},
    value::Literal,
};

/// How the parser treats an operand that is not part of a comparison,
/// such as the `active` in `active AND age > 30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Keep the operand as an [`Expr::Operand`] node. The rule parses but
    /// cannot be evaluated.
    #[default]
    Lenient,
    /// Reject the rule with [`ParseError::BareOperand`].
    Strict,
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(ParseMode::Lenient),
            "strict" => Ok(ParseMode::Strict),
            other => Err(format!("unknown parse mode '{other}' (expected 'strict' or 'lenient')")),
        }
    }
}

/// Deepest parenthesis nesting a rule may use.
pub const MAX_NESTING: usize = 256;

/// Grammar violations. Each names its cause; positions are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Input contained no tokens at all
    #[error("Empty rule")]
    EmptyInput,

    /// A token that cannot start an operand
    #[error("Unexpected token: {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },

    /// Input ended where an operand was required
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// `(` without a matching `)`
    #[error("Expected closing parenthesis for '(' at position {position}")]
    UnclosedParen { position: usize },

    /// `)` without a matching `(`
    #[error("Unmatched closing parenthesis at position {position}")]
    UnmatchedParen { position: usize },

    /// A complete expression was followed by more tokens
    #[error("Unexpected tokens at the end of expression: {found} at position {position}")]
    TrailingTokens { found: String, position: usize },

    /// Number literal too large to represent
    #[error("Number out of range: {found} at position {position}")]
    NumberOutOfRange { found: String, position: usize },

    /// Parentheses nested deeper than [`MAX_NESTING`]
    #[error("Parentheses nested too deeply at position {position}")]
    TooDeep { position: usize },

    #[error("Left-hand side of comparison must be an identifier")]
    NonIdentifierLhs,

    #[error("Right-hand side of comparison must be a literal")]
    NonLiteralRhs,

    /// Operand without a comparison, only reported in [`ParseMode::Strict`]
    #[error("Operand '{operand}' is not part of a comparison")]
    BareOperand { operand: String },
}

/// Result of the `Primary` production: a single operand, or a parenthesized
/// expression. Kept apart so a comparison can tell `age` from `(age)`.
enum Primary {
    Operand(Operand),
    Group(Expr),
}

/// Recursive-descent parser over a fully tokenized rule.
///
/// ```text
/// Expression := Or
/// Or         := And (OR And)*
/// And        := Comparison (AND Comparison)*
/// Comparison := Primary [CompOp Primary]
/// Primary    := '(' Expression ')' | IDENTIFIER | NUMBER | STRING
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    mode: ParseMode,
}

impl Parser {
    /// Tokenizes `input` and prepares a lenient parser over it.
    pub fn new(input: &str) -> Result<Self, LexError> {
        Ok(Parser::from_tokens(tokenize(input)?))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            current: 0,
            depth: 0,
            mode: ParseMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.current);
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    /// Parses a complete rule. Every token must be consumed.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let expr = self.parse_expression()?;

        match self.peek() {
            None => Ok(expr),
            Some(token) if token.kind == TokenKind::RParen => Err(ParseError::UnmatchedParen {
                position: token.position,
            }),
            Some(token) => Err(ParseError::TrailingTokens {
                found: token.to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(TokenKind::And) {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;

        let Some(op) = self.peek().and_then(|token| comparison_op(token.kind)) else {
            return match left {
                Primary::Group(expr) => Ok(expr),
                Primary::Operand(operand) => self.bare_operand(operand),
            };
        };
        self.advance();

        // The right-hand side is read before the left is checked, so
        // `(a = 1) >` reports the missing operand first.
        let right = self.parse_primary()?;

        let field = match left {
            Primary::Operand(Operand::Identifier(name)) => name,
            _ => return Err(ParseError::NonIdentifierLhs),
        };

        let value = match right {
            Primary::Operand(Operand::Literal(literal)) => literal,
            // A bare word on the right is read as text: `department = Sales`.
            Primary::Operand(Operand::Identifier(word)) => Literal::Text(word),
            Primary::Group(_) => return Err(ParseError::NonLiteralRhs),
        };

        Ok(Expr::Compare(Comparison { field, op, value }))
    }

    fn bare_operand(&self, operand: Operand) -> Result<Expr, ParseError> {
        match self.mode {
            ParseMode::Lenient => Ok(Expr::Operand(operand)),
            ParseMode::Strict => Err(ParseError::BareOperand {
                operand: Expr::Operand(operand).to_string(),
            }),
        }
    }

    fn parse_primary(&mut self) -> Result<Primary, ParseError> {
        let token = self.advance().cloned().ok_or(ParseError::UnexpectedEof)?;

        match token.kind {
            TokenKind::LParen => {
                if self.depth >= MAX_NESTING {
                    return Err(ParseError::TooDeep {
                        position: token.position,
                    });
                }
                self.depth += 1;
                let expr = self.parse_expression();
                self.depth -= 1;
                let expr = expr?;
                if !self.check(TokenKind::RParen) {
                    return Err(ParseError::UnclosedParen {
                        position: token.position,
                    });
                }
                self.advance();
                Ok(Primary::Group(expr))
            }
            TokenKind::Identifier => Ok(Primary::Operand(Operand::Identifier(token.text))),
            TokenKind::Number => {
                let n = token
                    .text
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| ParseError::NumberOutOfRange {
                        found: token.text.clone(),
                        position: token.position,
                    })?;
                Ok(Primary::Operand(Operand::Literal(Literal::Number(n))))
            }
            TokenKind::String => Ok(Primary::Operand(Operand::Literal(Literal::Text(
                token.literal().to_string(),
            )))),
            _ => Err(ParseError::UnexpectedToken {
                found: token.to_string(),
                position: token.position,
            }),
        }
    }
}

fn comparison_op(kind: TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::Gt => Some(CompareOp::GreaterThan),
        TokenKind::Lt => Some(CompareOp::LessThan),
        TokenKind::Eq => Some(CompareOp::Equal),
        TokenKind::NotEq => Some(CompareOp::NotEqual),
        TokenKind::GtEq => Some(CompareOp::GreaterEqual),
        TokenKind::LtEq => Some(CompareOp::LessEqual),
        _ => None,
    }
}
