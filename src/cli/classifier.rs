// Statement completeness detection
//
// Decides, for the text typed so far, whether the editor should accept the
// buffer or keep reading lines. Called on every Enter, so it must stay pure.

use tracing::trace;

use crate::lexer;

/// Commands that end the session. Matched against the whole trimmed buffer,
/// case-sensitively.
pub const EXIT_COMMANDS: [&str; 4] = ["exit", "quit", "\\q", ":q"];

/// Statement terminator character.
pub const TERMINATOR: char = ';';

/// Outcome of classifying a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the editor open and read another line
    Continue,
    /// The buffer is ready to be handed to the REPL
    Submit,
}

impl Verdict {
    pub fn is_submit(self) -> bool {
        self == Verdict::Submit
    }
}

/// Whether `text` (after trimming) is one of the exit commands.
pub fn is_exit_command(text: &str) -> bool {
    EXIT_COMMANDS.contains(&text.trim())
}

/// Classify the accumulated input buffer.
///
/// A trailing `;` is only a statement boundary if the lexer agrees: the last
/// token of the full buffer must be the terminator itself, not a string or
/// quoted identifier that happens to end in one. A buffer that fails to
/// tokenize is still open (unterminated literal) and keeps reading.
pub fn classify(buffer: &str) -> Verdict {
    let text = buffer.trim();

    if is_exit_command(text) {
        return Verdict::Submit;
    }

    if text.is_empty() || !text.ends_with(TERMINATOR) {
        return Verdict::Continue;
    }

    match lexer::tokenize(text) {
        Ok(tokens) => match tokens.last() {
            Some(token) if token.is_semicolon() => Verdict::Submit,
            _ => Verdict::Continue,
        },
        Err(err) => {
            trace!(error = %err, "buffer is lexically incomplete");
            Verdict::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminated_statement_submits() {
        assert_eq!(classify("select 1;"), Verdict::Submit);
        assert_eq!(classify("  select 1;  \n"), Verdict::Submit);
    }

    #[test]
    fn test_missing_terminator_continues() {
        assert_eq!(classify("select 1"), Verdict::Continue);
        assert_eq!(classify("select 1; select 2"), Verdict::Continue);
    }

    #[test]
    fn test_terminator_outside_literal_submits() {
        assert_eq!(classify("select ';';"), Verdict::Submit);
    }

    #[test]
    fn test_terminator_inside_open_literal_continues() {
        assert_eq!(classify("select 'a;"), Verdict::Continue);
        assert_eq!(classify("select $$ body;"), Verdict::Continue);
    }

    #[test]
    fn test_terminator_in_comment_continues() {
        assert_eq!(classify("select 1 # done;"), Verdict::Continue);
    }

    #[test]
    fn test_blank_input_continues() {
        assert_eq!(classify(""), Verdict::Continue);
        assert_eq!(classify("   "), Verdict::Continue);
        assert_eq!(classify("\n\t"), Verdict::Continue);
    }

    #[test]
    fn test_exit_commands_submit_without_terminator() {
        for cmd in EXIT_COMMANDS {
            assert_eq!(classify(cmd), Verdict::Submit, "{}", cmd);
            assert_eq!(classify(&format!("  {}\n", cmd)), Verdict::Submit);
        }
    }

    #[test]
    fn test_exit_commands_are_case_sensitive() {
        assert_eq!(classify("EXIT"), Verdict::Continue);
        assert_eq!(classify("Quit"), Verdict::Continue);
        assert!(!is_exit_command("exit now"));
    }

    #[test]
    fn test_unknown_character_continues() {
        assert_eq!(classify("select ~;"), Verdict::Continue);
    }

    #[test]
    fn test_multiline_buffer() {
        let buffer = "select User {\n  name,\n  email\n}\nfilter .name = 'x;y';";
        assert_eq!(classify(buffer), Verdict::Submit);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for input in ["select 1;", "select 'a;", "", "exit", "select ';';"] {
            assert_eq!(classify(input), classify(input));
        }
    }
}
