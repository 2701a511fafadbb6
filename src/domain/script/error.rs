//! Error and warning types for script loading.

use thiserror::Error;

/// Errors that abort a script load. Both variants carry the 1-based source
/// line the failure was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("lexical error at line {line}: {message}")]
    Lexical { line: u32, message: String },

    #[error("syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },
}

impl ScriptError {
    /// Creates a lexical error.
    pub fn lexical(line: u32, message: impl Into<String>) -> Self {
        ScriptError::Lexical {
            line,
            message: message.into(),
        }
    }

    /// Creates a syntax error.
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        ScriptError::Syntax {
            line,
            message: message.into(),
        }
    }

    /// The source line the error points at.
    pub fn line(&self) -> u32 {
        match self {
            ScriptError::Lexical { line, .. } | ScriptError::Syntax { line, .. } => *line,
        }
    }
}

/// Non-fatal notice that a step name was defined more than once.
///
/// The later definition replaces the earlier one in the registry; the loader
/// reports every overwrite so script authors can spot accidental shadowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateStepWarning {
    /// The step name that was redefined.
    pub name: String,
    /// Line of the definition that won.
    pub line: u32,
}

impl std::fmt::Display for DuplicateStepWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "step '{}' redefined at line {}; the later definition replaces the earlier one",
            self.name, self.line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_error_displays_line_and_message() {
        let err = ScriptError::lexical(3, "illegal character '$'");
        assert_eq!(
            err.to_string(),
            "lexical error at line 3: illegal character '$'"
        );
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn syntax_error_displays_line_and_message() {
        let err = ScriptError::syntax(7, "expected identifier");
        assert_eq!(err.to_string(), "syntax error at line 7: expected identifier");
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn duplicate_warning_names_step_and_line() {
        let warning = DuplicateStepWarning {
            name: "welcome".to_string(),
            line: 12,
        };
        assert!(warning.to_string().contains("welcome"));
        assert!(warning.to_string().contains("12"));
    }
}
