//! AST for parsed scripts: steps and their actions.

/// Default soft (reminder) timeout when a `Listen` omits its first argument.
pub const DEFAULT_REMINDER_SECS: u64 = 10;
/// Default hard (total-silence) timeout when a `Listen` omits its second argument.
pub const DEFAULT_TOTAL_SILENCE_SECS: u64 = 30;

/// A single action inside a step, in declaration order.
///
/// Closed sum type: the engine matches exhaustively, so adding an action kind
/// is a compile-time-checked exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Speak a literal message (parse-time `\n` already resolved).
    Speak { message: String },
    /// Wait for user input under the dual-timeout silence policy.
    Listen {
        reminder_timeout_secs: u64,
        total_silence_timeout_secs: u64,
    },
    /// Keyword-triggered edge to another step.
    Branch { keyword: String, target: String },
    /// Fallback edge when no branch matches.
    Default { target: String },
    /// Edge taken when the silence policy fires.
    Silence { target: String },
    /// Terminates the conversation when reached.
    Exit,
}

/// A named node in the conversation graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub actions: Vec<Action>,
    /// Source line of the `Step` keyword, kept for duplicate-definition warnings.
    pub line: u32,
}

impl Step {
    /// Creates a step with the given actions.
    pub fn new(name: impl Into<String>, actions: Vec<Action>, line: u32) -> Self {
        Self {
            name: name.into(),
            actions,
            line,
        }
    }

    /// The step's listen timeouts, if it has a `Listen` action.
    ///
    /// Only the first `Listen` is meaningful; later ones are unreachable in a
    /// single step invocation.
    pub fn listen_timeouts(&self) -> Option<(u64, u64)> {
        self.actions.iter().find_map(|a| match a {
            Action::Listen {
                reminder_timeout_secs,
                total_silence_timeout_secs,
            } => Some((*reminder_timeout_secs, *total_silence_timeout_secs)),
            _ => None,
        })
    }

    /// Branch keyword/target pairs in declaration order (used for
    /// first-match tie-breaking).
    pub fn branches(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions.iter().filter_map(|a| match a {
            Action::Branch { keyword, target } => Some((keyword.as_str(), target.as_str())),
            _ => None,
        })
    }

    /// Target of the step's `Default` action, if any.
    pub fn default_target(&self) -> Option<&str> {
        self.actions.iter().find_map(|a| match a {
            Action::Default { target } => Some(target.as_str()),
            _ => None,
        })
    }

    /// Target of the step's `Silence` action, if any.
    pub fn silence_target(&self) -> Option<&str> {
        self.actions.iter().find_map(|a| match a {
            Action::Silence { target } => Some(target.as_str()),
            _ => None,
        })
    }
}

/// An entire parsed script: the ordered step list.
///
/// Order matters for "last definition wins" when the loader folds the list
/// into the name-keyed registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub steps: Vec<Step>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_step() -> Step {
        Step::new(
            "welcome",
            vec![
                Action::Speak {
                    message: "hi".to_string(),
                },
                Action::Listen {
                    reminder_timeout_secs: 5,
                    total_silence_timeout_secs: 20,
                },
                Action::Branch {
                    keyword: "票".to_string(),
                    target: "open_ticket".to_string(),
                },
                Action::Branch {
                    keyword: "门票".to_string(),
                    target: "ticket".to_string(),
                },
                Action::Default {
                    target: "fallback".to_string(),
                },
                Action::Silence {
                    target: "remind".to_string(),
                },
            ],
            1,
        )
    }

    #[test]
    fn listen_timeouts_returns_first_listen() {
        assert_eq!(sample_step().listen_timeouts(), Some((5, 20)));
    }

    #[test]
    fn listen_timeouts_is_none_without_listen() {
        let step = Step::new("terminal", vec![Action::Exit], 1);
        assert_eq!(step.listen_timeouts(), None);
    }

    #[test]
    fn branches_preserve_declaration_order() {
        let step = sample_step();
        let branches: Vec<_> = step.branches().collect();
        assert_eq!(branches, vec![("票", "open_ticket"), ("门票", "ticket")]);
    }

    #[test]
    fn default_and_silence_targets_are_found() {
        let step = sample_step();
        assert_eq!(step.default_target(), Some("fallback"));
        assert_eq!(step.silence_target(), Some("remind"));
    }
}
