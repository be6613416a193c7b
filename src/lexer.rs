use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{Token, TokenKind};

/// No token pattern matched at `position` (a byte offset into the input).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected character '{character}' at position {position}")]
pub struct LexError {
    pub position: usize,
    pub character: char,
}

/// Token patterns in priority order; the first one that matches wins.
///
/// `>=`, `<=` and `!=` come before `>` and `<`, and the logical keywords
/// need a word boundary so `ANDY` stays an identifier. A `None` kind is
/// matched and skipped.
const PATTERNS: &[(&str, Option<TokenKind>)] = &[
    (r"^\(", Some(TokenKind::LParen)),
    (r"^\)", Some(TokenKind::RParen)),
    (r"(?i)^AND\b", Some(TokenKind::And)),
    (r"(?i)^OR\b", Some(TokenKind::Or)),
    (r"^>=", Some(TokenKind::GtEq)),
    (r"^<=", Some(TokenKind::LtEq)),
    (r"^!=", Some(TokenKind::NotEq)),
    (r"^>", Some(TokenKind::Gt)),
    (r"^<", Some(TokenKind::Lt)),
    (r"^=", Some(TokenKind::Eq)),
    (r"^[A-Za-z_][A-Za-z0-9_]*", Some(TokenKind::Identifier)),
    (r"^[0-9]+(\.[0-9]+)?", Some(TokenKind::Number)),
    (r#"^"[^"]*""#, Some(TokenKind::String)),
    (r"^'[^']*'", Some(TokenKind::String)),
    (r"^\s+", None),
];

fn rules() -> &'static [(Regex, Option<TokenKind>)] {
    static RULES: OnceLock<Vec<(Regex, Option<TokenKind>)>> = OnceLock::new();
    // PATTERNS is fixed; test_patterns_compile covers every entry.
    RULES.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(pattern, kind)| (Regex::new(pattern).expect("valid token pattern"), *kind))
            .collect()
    })
}

/// Forward-only tokenizer over a rule string.
///
/// Yields tokens in source order. After the first [`LexError`] the lexer is
/// exhausted.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the next token, `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        'scan: while !self.is_eof() {
            let rest = &self.input[self.position..];

            for (regex, kind) in rules() {
                let Some(found) = regex.find(rest) else {
                    continue;
                };
                let start = self.position;
                self.position += found.end();

                match kind {
                    Some(kind) => return Ok(Some(Token::new(*kind, found.as_str(), start))),
                    None => continue 'scan,
                }
            }

            let character = rest.chars().next().unwrap_or('\0');
            let position = self.position;
            self.position = self.input.len();
            return Err(LexError {
                position,
                character,
            });
        }

        Ok(None)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Tokenizes the whole input upfront.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect()
}

#[test]
fn test_patterns_compile() {
    for (pattern, _) in PATTERNS {
        assert!(Regex::new(pattern).is_ok(), "invalid pattern {pattern}");
    }
    assert_eq!(rules().len(), PATTERNS.len());
}

#[test]
fn test_keywords() {
    let tokens = tokenize("AND or And").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::And, TokenKind::Or, TokenKind::And]);
}

#[test]
fn test_rule() {
    let tokens = tokenize("age >= 18 AND status = 'Active'").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::GtEq,
            TokenKind::Number,
            TokenKind::And,
            TokenKind::Identifier,
            TokenKind::Eq,
            TokenKind::String,
        ]
    );
    assert_eq!(tokens[6].literal(), "Active");
    assert_eq!(tokens[6].position, 23);
}
