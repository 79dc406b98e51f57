// rustyline helper: multiline validation and syntax highlighting
//
// The validator is what makes Enter insert a newline instead of submitting
// while a statement is unfinished. The highlighter reuses the query lexer;
// text after a lexical error (e.g. an open string) is left uncolored.

use crossterm::style::{Color, Stylize};
use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::Helper;
use std::borrow::Cow;

use super::classifier::{classify, Verdict};
use crate::lexer::{Lexer, TokenKind};

const PROMPT_COLOR: Color = Color::Rgb {
    r: 0xaa,
    g: 0xaa,
    b: 0xaa,
};
const KEYWORD_COLOR: Color = Color::Rgb {
    r: 0xe8,
    g: 0x36,
    b: 0x4f,
};
const STRING_COLOR: Color = Color::Rgb {
    r: 0xd3,
    g: 0xc9,
    b: 0x70,
};
const NUMBER_COLOR: Color = Color::Rgb {
    r: 0x9a,
    g: 0x79,
    b: 0xd7,
};

pub struct QueryHelper {
    color: bool,
}

impl QueryHelper {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

fn token_color(kind: TokenKind) -> Option<Color> {
    match kind {
        TokenKind::Keyword | TokenKind::Operator => Some(KEYWORD_COLOR),
        TokenKind::Str => Some(STRING_COLOR),
        TokenKind::Number => Some(NUMBER_COLOR),
        _ => None,
    }
}

/// Render `line` with ANSI colors for the tokens that have one.
pub fn highlight_query(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    let mut cursor = 0;

    for token in Lexer::new(line) {
        let Ok(token) = token else { break };
        let text = token.text(line);
        out.push_str(&line[cursor..token.span.start]);
        match token_color(token.kind) {
            Some(color) => out.push_str(&text.with(color).to_string()),
            None => out.push_str(text),
        }
        cursor = token.span.end;
    }

    out.push_str(&line[cursor..]);
    out
}

impl Validator for QueryHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(match classify(ctx.input()) {
            Verdict::Submit => ValidationResult::Valid(None),
            Verdict::Continue => ValidationResult::Incomplete,
        })
    }
}

impl Highlighter for QueryHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.color {
            Cow::Owned(highlight_query(line))
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        if self.color {
            Cow::Owned(prompt.with(PROMPT_COLOR).to_string())
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.color
    }
}

impl Completer for QueryHelper {
    type Candidate = String;
}

impl Hinter for QueryHelper {
    type Hint = String;
}

impl Helper for QueryHelper {}
