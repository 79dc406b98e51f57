// Token types produced by the query lexer

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word (matched case-insensitively)
    Keyword,
    Ident,
    /// Backtick-quoted identifier
    QuotedIdent,
    /// Any string literal: quoted, raw, bytes or dollar-quoted
    Str,
    Number,
    /// Query parameter such as `$name` or `$0`
    Parameter,
    Operator,
    /// Brackets, comma, dot and colon
    Punct,
    /// Statement terminator
    Semicolon,
}

/// Location of a token in the scanned text.
///
/// `start`/`end` are byte offsets, `line`/`column` are 1-based and point at
/// the first character of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Slice of `source` covered by this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    pub fn is_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon
    }
}

static KEYWORDS: &[&str] = &[
    "abstract",
    "alter",
    "and",
    "anyarray",
    "anytuple",
    "anytype",
    "begin",
    "by",
    "commit",
    "configure",
    "create",
    "declare",
    "delete",
    "describe",
    "detached",
    "distinct",
    "do",
    "drop",
    "else",
    "empty",
    "exists",
    "explain",
    "extending",
    "false",
    "filter",
    "for",
    "function",
    "global",
    "group",
    "if",
    "ilike",
    "import",
    "in",
    "insert",
    "introspect",
    "is",
    "like",
    "limit",
    "link",
    "module",
    "multi",
    "not",
    "offset",
    "optional",
    "or",
    "order",
    "over",
    "partition",
    "property",
    "required",
    "reset",
    "rollback",
    "select",
    "set",
    "single",
    "start",
    "transaction",
    "true",
    "type",
    "typeof",
    "union",
    "update",
    "variadic",
    "with",
];

/// Case-insensitive reserved word lookup.
pub fn is_keyword(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    KEYWORDS.binary_search(&lower.as_str()).is_ok()
}
