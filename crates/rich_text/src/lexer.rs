//! Markup lexer
//!
//! A cursor over one line of text. At every position the delimiter table is
//! consulted in order, so precedence is simply table order:
//! block math (`$$`, `\[`) before inline math (`\(`, `$`), and bold (`**`)
//! before italic (`*`).

use crate::{Token, TokenKind};

/// Opening delimiter, closing delimiter and the kind of run they enclose
const DELIMITERS: [(&str, &str, TokenKind); 6] = [
    ("$$", "$$", TokenKind::BlockMath),
    ("\\[", "\\]", TokenKind::BlockMath),
    ("\\(", "\\)", TokenKind::InlineMath),
    ("$", "$", TokenKind::InlineMath),
    ("**", "**", TokenKind::Bold),
    ("*", "*", TokenKind::Italic),
];

/// Outcome of probing for a delimited run at one position
enum Scan {
    /// No delimiter opens here
    None,
    /// A complete run: its kind, payload byte range and end position
    Matched {
        kind: TokenKind,
        content: (usize, usize),
        end: usize,
    },
    /// A delimiter opens immediately followed by its closer; the opener is
    /// literal text of the given length
    Empty(usize),
    /// A delimiter opens but never closes on this line
    Unterminated,
}

/// Tokenizing iterator over a single line
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn scan_at(&self, at: usize) -> Scan {
        let rest = &self.src[at..];
        for (open, close, kind) in DELIMITERS {
            if !rest.starts_with(open) {
                continue;
            }
            let body_start = at + open.len();
            return match self.src[body_start..].find(close) {
                Some(0) => Scan::Empty(open.len()),
                Some(offset) => Scan::Matched {
                    kind,
                    content: (body_start, body_start + offset),
                    end: body_start + offset + close.len(),
                },
                None => Scan::Unterminated,
            };
        }
        Scan::None
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.src.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < self.src.len() {
            match self.scan_at(self.pos) {
                Scan::Matched { kind, content, end } => {
                    if self.pos > start {
                        // Flush pending plain text; the run is re-scanned next call
                        return Some(Token::Plain(self.src[start..self.pos].to_string()));
                    }
                    self.pos = end;
                    return Some(Token::new(kind, &self.src[content.0..content.1]));
                }
                Scan::Unterminated => {
                    self.pos = self.src.len();
                }
                Scan::Empty(len) => {
                    self.pos += len;
                }
                Scan::None => {
                    let ch_len = self.src[self.pos..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    self.pos += ch_len;
                }
            }
        }

        Some(Token::Plain(self.src[start..self.pos].to_string()))
    }
}

/// Split a line into an ordered token stream covering the whole line
pub fn tokenize(line: &str) -> Vec<Token> {
    Lexer::new(line).collect()
}
