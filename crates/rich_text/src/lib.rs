//! Rich Text - Inline markup tokenizer
//!
//! Splits a single line of lightly marked-up text into typed runs:
//! `**bold**`, `*italic*`, inline math (`$..$`, `\(..\)`) and block math
//! (`$$..$$`, `\[..\]`). Tokenizing never fails; unterminated markup is
//! kept as literal text.

mod lexer;
mod list;
mod token;

pub use lexer::*;
pub use list::*;
pub use token::*;
