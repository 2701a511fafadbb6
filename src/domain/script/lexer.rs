//! Lexer for the step DSL.
//!
//! Single left-to-right pass over the script text, producing a flat token
//! sequence terminated by an end-of-input token. Whitespace and `#` comments
//! are skipped; line numbers are tracked for diagnostics.

use super::error::ScriptError;
use super::token::{is_keyword, Token, TokenKind};

/// Hand-written scanner over the script text.
///
/// The lexer is a pure function of its input: [`Lexer::tokenize`] either
/// yields the full token sequence or a [`ScriptError::Lexical`].
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl Lexer {
    /// Creates a lexer over the given script text.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Lexes the whole input into a token sequence ending with end-of-input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ScriptError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::EndOfInput;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' {
            self.line += 1;
        }
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ScriptError> {
        self.skip_whitespace_and_comments();

        let Some(c) = self.peek() else {
            return Ok(Token::end_of_input(self.line));
        };

        if c == '"' {
            return self.lex_string();
        }
        if c.is_ascii_digit() {
            return Ok(self.lex_number());
        }
        if c.is_alphanumeric() || c == '_' {
            return Ok(self.lex_word());
        }
        if c == ',' {
            let line = self.line;
            self.advance();
            return Ok(Token::new(TokenKind::Comma, ",", line));
        }

        Err(ScriptError::lexical(
            self.line,
            format!("illegal character '{}' at offset {}", c, self.pos),
        ))
    }

    /// Scans a double-quoted string. Content is copied verbatim, including
    /// raw newlines; an unterminated string is reported against the line the
    /// opening quote appeared on.
    fn lex_string(&mut self) -> Result<Token, ScriptError> {
        let open_line = self.line;
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(Token::new(TokenKind::StringLiteral, value, open_line)),
                Some(c) => value.push(c),
                None => {
                    return Err(ScriptError::lexical(
                        open_line,
                        format!("unterminated string literal: \"{}", value),
                    ))
                }
            }
        }
    }

    fn lex_number(&mut self) -> Token {
        let line = self.line;
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            value.push(c);
            self.advance();
        }
        Token::new(TokenKind::NumberLiteral, value, line)
    }

    /// Scans an identifier or keyword: a maximal run of letters, digits and
    /// underscores. The caller guarantees the first character is not a digit.
    fn lex_word(&mut self) -> Token {
        let line = self.line;
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            value.push(c);
            self.advance();
        }
        let kind = if is_keyword(&value) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, value, line)
    }
}

/// Convenience wrapper: lex the whole script in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    Lexer::new(source).tokenize()
}
