use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Left parenthesis, opens a group
    LParen,

    /// Right parenthesis, closes a group
    RParen,

    // Logical
    /// Logical AND (whole word, any case)
    ///
    /// # Examples
    /// ```text
    /// age > 30 AND department = 'Sales'
    /// age > 30 and department = 'Sales'
    /// ```
    And,

    /// Logical OR (whole word, any case)
    ///
    /// # Examples
    /// ```text
    /// age < 25 OR age > 60
    /// ```
    Or,

    // Comparison
    /// Greater than or equal (`>=`)
    GtEq,

    /// Less than or equal (`<=`)
    LtEq,

    /// Not equal (`!=`)
    NotEq,

    /// Greater than (`>`)
    Gt,

    /// Less than (`<`)
    Lt,

    /// Equal (`=`)
    Eq,

    // Operands
    /// Field name
    ///
    /// Must start with an ASCII letter or underscore, followed by ASCII
    /// letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// age
    /// salary_band
    /// _internal
    /// ```
    Identifier,

    /// Unsigned integer or decimal number
    ///
    /// # Examples
    /// ```text
    /// 30
    /// 5000.50
    /// ```
    Number,

    /// String literal in single or double quotes, no escape sequences
    ///
    /// # Examples
    /// ```text
    /// 'Sales'
    /// "Marketing"
    /// ```
    String,
}

impl TokenKind {
    /// Returns true for the six comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::GtEq
                | TokenKind::LtEq
                | TokenKind::NotEq
                | TokenKind::Gt
                | TokenKind::Lt
                | TokenKind::Eq
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::GtEq => "GTE",
            TokenKind::LtEq => "LTE",
            TokenKind::NotEq => "NEQ",
            TokenKind::Gt => "GT",
            TokenKind::Lt => "LT",
            TokenKind::Eq => "EQ",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
        };
        f.write_str(name)
    }
}

/// A token produced by the lexer: its kind, the exact source text it was
/// matched from, and the byte offset where that text starts.
///
/// For [`TokenKind::String`] the `text` keeps its surrounding quotes; use
/// [`Token::literal`] to get the stripped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    /// The literal value carried by the token. Quotes are stripped from
    /// string tokens; every other kind returns its source text unchanged.
    pub fn literal(&self) -> &str {
        match self.kind {
            TokenKind::String if self.text.len() >= 2 => &self.text[1..self.text.len() - 1],
            _ => &self.text,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' of type {}", self.text, self.kind)
    }
}
