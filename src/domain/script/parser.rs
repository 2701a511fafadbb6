//! Recursive-descent parser for the step DSL.
//!
//! Grammar (comments `#` to end of line, whitespace insignificant outside
//! strings):
//!
//! ```text
//! program   := step*
//! step      := "Step" IDENT action*
//! action    := speak | listen | branch | default | silence | exit
//! speak     := "Speak" STRING
//! listen    := "Listen" [ NUMBER [ "," NUMBER ] ]
//! branch    := "Branch" STRING [","] IDENT
//! default   := "Default" IDENT
//! silence   := "Silence" IDENT
//! exit      := "Exit"
//! ```
//!
//! One token of lookahead; parsing aborts on the first error.

use super::ast::{Action, Program, Step, DEFAULT_REMINDER_SECS, DEFAULT_TOTAL_SILENCE_SECS};
use super::error::ScriptError;
use super::token::{Token, TokenKind};

/// Token-stream parser producing a [`Program`].
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a parser over a lexed token sequence.
    ///
    /// The sequence is expected to end with an end-of-input token, as
    /// produced by [`super::lexer::tokenize`].
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses the whole program: steps until end of input.
    pub fn parse_program(mut self) -> Result<Program, ScriptError> {
        let mut steps = Vec::new();
        while self.current().kind != TokenKind::EndOfInput {
            steps.push(self.parse_step()?);
        }
        Ok(Program { steps })
    }

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with EndOfInput, so an
        // in-bounds read is guaranteed while pos only advances past real
        // tokens; the fallback covers a caller-built stream missing it.
        static FALLBACK: once_cell::sync::Lazy<Token> =
            once_cell::sync::Lazy::new(|| Token::end_of_input(0));
        self.tokens.get(self.pos).unwrap_or(&FALLBACK)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Consumes the current token if it matches, else fails with the line,
    /// expectation and actual token.
    fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> Result<Token, ScriptError> {
        let token = self.current().clone();
        let matches = token.kind == kind && value.map_or(true, |v| token.text == v);
        if !matches {
            let expected = match value {
                Some(v) => format!("{} '{}'", kind, v),
                None => kind.to_string(),
            };
            return Err(ScriptError::syntax(
                token.line,
                format!("expected {}, got {}", expected, token),
            ));
        }
        self.advance();
        Ok(token)
    }

    /// `step := "Step" IDENT action*` — actions run until the next `Step`
    /// keyword or end of input.
    fn parse_step(&mut self) -> Result<Step, ScriptError> {
        let step_token = self.expect(TokenKind::Keyword, Some("Step"))?;
        let name = self.expect(TokenKind::Identifier, None)?.text;

        let mut actions = Vec::new();
        loop {
            let token = self.current();
            if token.kind == TokenKind::EndOfInput || token.is_keyword("Step") {
                break;
            }
            if token.kind != TokenKind::Keyword {
                return Err(ScriptError::syntax(
                    token.line,
                    format!(
                        "in step '{}': expected an action keyword, got {}",
                        name, token
                    ),
                ));
            }
            let action = match token.text.as_str() {
                "Speak" => self.parse_speak()?,
                "Listen" => self.parse_listen()?,
                "Branch" => self.parse_branch()?,
                "Default" => self.parse_default()?,
                "Silence" => self.parse_silence()?,
                "Exit" => self.parse_exit()?,
                other => {
                    return Err(ScriptError::syntax(
                        token.line,
                        format!("in step '{}': '{}' is not an action keyword", name, other),
                    ))
                }
            };
            actions.push(action);
        }

        Ok(Step::new(name, actions, step_token.line))
    }

    /// `speak := "Speak" STRING` — resolves `\n` escapes to literal newlines.
    fn parse_speak(&mut self) -> Result<Action, ScriptError> {
        self.expect(TokenKind::Keyword, Some("Speak"))?;
        let raw = self.expect(TokenKind::StringLiteral, None)?.text;
        Ok(Action::Speak {
            message: raw.replace("\\n", "\n"),
        })
    }

    /// `listen := "Listen" [ NUMBER [ "," NUMBER ] ]` — zero, one or two
    /// arguments, applied positionally to reminder then total. The permissive
    /// arity is intentional; omitted values take the defaults (10s / 30s).
    fn parse_listen(&mut self) -> Result<Action, ScriptError> {
        self.expect(TokenKind::Keyword, Some("Listen"))?;
        let mut reminder = DEFAULT_REMINDER_SECS;
        let mut total = DEFAULT_TOTAL_SILENCE_SECS;

        if self.current().kind == TokenKind::NumberLiteral {
            reminder = self.parse_seconds()?;
            if self.current().kind == TokenKind::Comma {
                self.advance();
                total = self.parse_seconds()?;
            }
        }

        Ok(Action::Listen {
            reminder_timeout_secs: reminder,
            total_silence_timeout_secs: total,
        })
    }

    /// `branch := "Branch" STRING [","] IDENT` — the comma is accepted but
    /// never required.
    fn parse_branch(&mut self) -> Result<Action, ScriptError> {
        self.expect(TokenKind::Keyword, Some("Branch"))?;
        let keyword = self.expect(TokenKind::StringLiteral, None)?.text;
        if self.current().kind == TokenKind::Comma {
            self.advance();
        }
        let target = self.expect(TokenKind::Identifier, None)?.text;
        Ok(Action::Branch { keyword, target })
    }

    fn parse_default(&mut self) -> Result<Action, ScriptError> {
        self.expect(TokenKind::Keyword, Some("Default"))?;
        let target = self.expect(TokenKind::Identifier, None)?.text;
        Ok(Action::Default { target })
    }

    fn parse_silence(&mut self) -> Result<Action, ScriptError> {
        self.expect(TokenKind::Keyword, Some("Silence"))?;
        let target = self.expect(TokenKind::Identifier, None)?.text;
        Ok(Action::Silence { target })
    }

    fn parse_exit(&mut self) -> Result<Action, ScriptError> {
        self.expect(TokenKind::Keyword, Some("Exit"))?;
        Ok(Action::Exit)
    }

    fn parse_seconds(&mut self) -> Result<u64, ScriptError> {
        let token = self.expect(TokenKind::NumberLiteral, None)?;
        token.text.parse::<u64>().map_err(|_| {
            ScriptError::syntax(
                token.line,
                format!("timeout value '{}' is out of range", token.text),
            )
        })
    }
}

/// Convenience wrapper: lex and parse a script source in one call.
pub fn parse_source(source: &str) -> Result<Program, ScriptError> {
    let tokens = super::lexer::tokenize(source)?;
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_step(source: &str) -> Step {
        let program = parse_source(source).unwrap();
        assert_eq!(program.steps.len(), 1);
        program.steps.into_iter().next().unwrap()
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        let program = parse_source("# nothing but a comment\n").unwrap();
        assert!(program.steps.is_empty());
    }

    #[test]
    fn step_collects_actions_until_next_step() {
        let program = parse_source(
            "Step welcome\n  Speak \"hi\"\n  Listen 5, 20\nStep other\n  Exit",
        )
        .unwrap();
        assert_eq!(program.steps.len(), 2);
        assert_eq!(program.steps[0].name, "welcome");
        assert_eq!(program.steps[0].actions.len(), 2);
        assert_eq!(program.steps[1].name, "other");
        assert_eq!(program.steps[1].actions, vec![Action::Exit]);
    }

    #[test]
    fn speak_resolves_newline_escapes() {
        let step = only_step(r#"Step s Speak "a\nb""#);
        assert_eq!(
            step.actions[0],
            Action::Speak {
                message: "a\nb".to_string()
            }
        );
    }

    #[test]
    fn listen_with_no_arguments_takes_defaults() {
        let step = only_step("Step s Listen");
        assert_eq!(step.listen_timeouts(), Some((10, 30)));
    }

    #[test]
    fn listen_with_one_argument_sets_reminder_only() {
        let step = only_step("Step s Listen 7");
        assert_eq!(step.listen_timeouts(), Some((7, 30)));
    }

    #[test]
    fn listen_with_two_arguments_sets_both() {
        let step = only_step("Step s Listen 7, 45");
        assert_eq!(step.listen_timeouts(), Some((7, 45)));
    }

    #[test]
    fn branch_comma_is_optional() {
        let with_comma = only_step(r#"Step s Branch "门票", ticket"#);
        let without_comma = only_step(r#"Step s Branch "门票" ticket"#);
        assert_eq!(with_comma.actions, without_comma.actions);
        assert_eq!(
            with_comma.actions[0],
            Action::Branch {
                keyword: "门票".to_string(),
                target: "ticket".to_string()
            }
        );
    }

    #[test]
    fn unknown_keyword_in_body_reports_its_line() {
        // `Step` is the only non-action keyword, so a stray identifier is the
        // usual authoring mistake.
        let err = parse_source("Step welcome\nSpeak \"hi\"\nGoto other").unwrap_err();
        match err {
            ScriptError::Syntax { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("welcome"));
                assert!(message.contains("Goto"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn missing_step_name_is_a_syntax_error() {
        let err = parse_source("Step\nSpeak \"hi\"").unwrap_err();
        match err {
            ScriptError::Syntax { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("identifier"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn action_before_any_step_is_rejected() {
        let err = parse_source("Speak \"orphan\"").unwrap_err();
        assert!(matches!(err, ScriptError::Syntax { line: 1, .. }));
    }

    #[test]
    fn speak_requires_a_string_argument() {
        let err = parse_source("Step s Speak welcome").unwrap_err();
        match err {
            ScriptError::Syntax { message, .. } => {
                assert!(message.contains("string literal"));
                assert!(message.contains("welcome"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_steps_are_kept_in_declaration_order() {
        let program =
            parse_source("Step a\nSpeak \"one\"\nStep b\nExit\nStep a\nSpeak \"two\"").unwrap();
        let names: Vec<_> = program.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
    }
}
