//! Token types

use serde::{Deserialize, Serialize};

/// Markup classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Plain,
    Bold,
    Italic,
    InlineMath,
    BlockMath,
}

impl TokenKind {
    pub fn is_math(self) -> bool {
        matches!(self, TokenKind::InlineMath | TokenKind::BlockMath)
    }
}

/// A typed, contiguous run of text. The payload excludes the delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Token {
    Plain(String),
    Bold(String),
    Italic(String),
    InlineMath(String),
    BlockMath(String),
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        let text = text.into();
        match kind {
            TokenKind::Plain => Token::Plain(text),
            TokenKind::Bold => Token::Bold(text),
            TokenKind::Italic => Token::Italic(text),
            TokenKind::InlineMath => Token::InlineMath(text),
            TokenKind::BlockMath => Token::BlockMath(text),
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Plain(_) => TokenKind::Plain,
            Token::Bold(_) => TokenKind::Bold,
            Token::Italic(_) => TokenKind::Italic,
            Token::InlineMath(_) => TokenKind::InlineMath,
            Token::BlockMath(_) => TokenKind::BlockMath,
        }
    }

    /// The payload without delimiters
    pub fn text(&self) -> &str {
        match self {
            Token::Plain(s)
            | Token::Bold(s)
            | Token::Italic(s)
            | Token::InlineMath(s)
            | Token::BlockMath(s) => s,
        }
    }
}

/// Concatenate the payloads of a token stream
pub fn plain_text(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}
