//! Token model for the step DSL.

use std::fmt;

/// The closed keyword set of the DSL.
pub const KEYWORDS: [&str; 7] = [
    "Step", "Speak", "Listen", "Branch", "Silence", "Default", "Exit",
];

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// One of the fixed action/structure keywords.
    Keyword,
    /// A step name: `[A-Za-z_][A-Za-z0-9_]*`, case-sensitive.
    Identifier,
    /// Double-quoted string literal (content stored without the quotes).
    StringLiteral,
    /// Maximal run of decimal digits, no sign or fraction.
    NumberLiteral,
    /// The only punctuation token.
    Comma,
    /// End of input; always the final token of a lex.
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::NumberLiteral => "number literal",
            TokenKind::Comma => "','",
            TokenKind::EndOfInput => "end of input",
        };
        write!(f, "{}", s)
    }
}

/// A single token with its source line (1-based) for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// The end-of-input sentinel for the given line.
    pub fn end_of_input(line: u32) -> Self {
        Self::new(TokenKind::EndOfInput, "", line)
    }

    /// True if this token is the given keyword.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}

/// True if the word belongs to the fixed keyword set.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}
