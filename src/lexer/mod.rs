// Query tokenizer
//
// Thin adapter over the scanner: the classifier needs the whole token list
// (or the first error), the highlighter needs the valid prefix.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{is_keyword, Span, Token, TokenKind};

use crate::errors::LexError;

/// Tokenize `text` completely, failing on the first lexical error.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(text).collect()
}
