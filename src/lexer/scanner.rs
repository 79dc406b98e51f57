// Character scanner for the query language
//
// Produces tokens lazily. Whitespace and `#` comments are skipped, so the
// last token of a buffer is always something the server would see. The first
// lexical error ends the stream.

use super::token::{is_keyword, Span, Token, TokenKind};
use crate::errors::LexError;

/// Multi-character operators, longest first so maximal munch works with a
/// plain prefix scan.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "?!=", ":=", "->", "??", "++", "//", "!=", "?=", "<=", ">=", "::", ".<", "..",
];

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        if self.failed {
            return None;
        }

        self.skip_trivia();

        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let ch = self.peek()?;

        let kind = match ch {
            ';' => {
                self.bump();
                Ok(TokenKind::Semicolon)
            }
            '\'' | '"' => self.scan_string(true),
            '`' => self.scan_quoted_ident(),
            '$' => self.scan_dollar(),
            'r' | 'b' if matches!(self.peek_nth(1), Some('\'' | '"')) => {
                self.bump();
                self.scan_string(ch == 'b')
            }
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_word()),
            c if c.is_ascii_digit() => Ok(self.scan_number()),
            _ => self.scan_operator(),
        };

        match kind {
            Ok(kind) => Some(Ok(Token {
                kind,
                span: Span {
                    start,
                    end: self.pos,
                    line,
                    column,
                },
            })),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn advance_to(&mut self, target: usize) {
        while self.pos < target {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => self.bump_while(|c| c != '\n'),
                _ => return,
            }
        }
    }

    fn unterminated(&self, what: &'static str, line: u32, column: u32) -> LexError {
        LexError::Unterminated { what, line, column }
    }

    /// Quoted string; the cursor sits on the opening quote.
    fn scan_string(&mut self, escapes: bool) -> Result<TokenKind, LexError> {
        let (line, column) = (self.line, self.column);
        let quote = self.bump().unwrap_or('\'');

        loop {
            match self.bump() {
                None => return Err(self.unterminated("string literal", line, column)),
                Some('\\') if escapes => {
                    if self.bump().is_none() {
                        return Err(self.unterminated("string literal", line, column));
                    }
                }
                Some(c) if c == quote => return Ok(TokenKind::Str),
                Some(_) => {}
            }
        }
    }

    fn scan_quoted_ident(&mut self) -> Result<TokenKind, LexError> {
        let (line, column) = (self.line, self.column);
        self.bump();

        loop {
            match self.bump() {
                None => return Err(self.unterminated("quoted identifier", line, column)),
                Some('`') if self.peek() == Some('`') => {
                    self.bump();
                }
                Some('`') => return Ok(TokenKind::QuotedIdent),
                Some(_) => {}
            }
        }
    }

    /// `$tag$ ... $tag$`, `$$ ... $$`, or a `$name` / `$0` parameter.
    fn scan_dollar(&mut self) -> Result<TokenKind, LexError> {
        let (line, column) = (self.line, self.column);
        self.bump();

        match self.peek() {
            Some('$') => {
                self.bump();
                self.scan_dollar_body("", line, column)
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                let tag_start = self.pos;
                self.bump_while(|c| c.is_alphanumeric() || c == '_');
                let tag = &self.input[tag_start..self.pos];
                if self.peek() == Some('$') {
                    self.bump();
                    self.scan_dollar_body(tag, line, column)
                } else {
                    Ok(TokenKind::Parameter)
                }
            }
            Some(c) if c.is_ascii_digit() => {
                self.bump_while(|c| c.is_ascii_digit());
                Ok(TokenKind::Parameter)
            }
            _ => Err(LexError::UnknownToken {
                ch: '$',
                line,
                column,
            }),
        }
    }

    fn scan_dollar_body(
        &mut self,
        tag: &str,
        line: u32,
        column: u32,
    ) -> Result<TokenKind, LexError> {
        let delimiter = format!("${}$", tag);
        match self.rest().find(&delimiter) {
            Some(offset) => {
                self.advance_to(self.pos + offset + delimiter.len());
                Ok(TokenKind::Str)
            }
            None => Err(self.unterminated("dollar-quoted string", line, column)),
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        self.bump_while(|c| c.is_alphanumeric() || c == '_');
        if is_keyword(&self.input[start..self.pos]) {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        self.bump_while(|c| c.is_ascii_digit() || c == '_');

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_nth(1) {
                Some('+' | '-') => self.peek_nth(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.bump_while(|c| c.is_ascii_digit());
            }
        }

        if self.peek() == Some('n') {
            self.bump();
        }

        TokenKind::Number
    }

    fn scan_operator(&mut self) -> Result<TokenKind, LexError> {
        if let Some(op) = MULTI_CHAR_OPERATORS
            .iter()
            .find(|op| self.rest().starts_with(**op))
        {
            self.advance_to(self.pos + op.len());
            return Ok(TokenKind::Operator);
        }

        let (line, column) = (self.line, self.column);
        match self.bump() {
            Some('(' | ')' | '[' | ']' | '{' | '}' | ',' | '.' | ':') => Ok(TokenKind::Punct),
            Some('+' | '-' | '*' | '/' | '%' | '^' | '<' | '>' | '=' | '?' | '@' | '&' | '|') => {
                Ok(TokenKind::Operator)
            }
            Some(ch) => Err(LexError::UnknownToken { ch, line, column }),
            None => Err(self.unterminated("input", line, column)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
