//! Script registry: the name-keyed step mapping produced by a load.

use std::collections::HashMap;

use tracing::warn;

use super::ast::{Program, Step};
use super::error::{DuplicateStepWarning, ScriptError};
use super::parser::parse_source;

/// Immutable step lookup shared by all sessions after a successful load.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    steps: HashMap<String, Step>,
}

/// Result of a successful load: the registry plus any non-fatal warnings.
#[derive(Debug, Clone)]
pub struct LoadedScript {
    pub registry: ScriptRegistry,
    pub warnings: Vec<DuplicateStepWarning>,
}

impl ScriptRegistry {
    /// Loads a script source: lex, parse, then fold the step list into the
    /// name-keyed mapping.
    ///
    /// Later definitions of a repeated step name replace earlier ones; each
    /// overwrite is reported as a [`DuplicateStepWarning`]. The load is
    /// all-or-nothing: on error no registry is produced, and a reload
    /// replaces the mapping wholesale.
    pub fn load(source: &str) -> Result<LoadedScript, ScriptError> {
        let program = parse_source(source)?;
        Ok(Self::from_program(program))
    }

    /// Folds an already-parsed program into a registry.
    pub fn from_program(program: Program) -> LoadedScript {
        let mut steps: HashMap<String, Step> = HashMap::with_capacity(program.steps.len());
        let mut warnings = Vec::new();

        for step in program.steps {
            if let Some((reminder, total)) = step.listen_timeouts() {
                if reminder > total {
                    // Accepted, not rejected: the hard timeout's priority
                    // means the reminder simply never fires at run time.
                    warn!(
                        step = %step.name,
                        reminder_secs = reminder,
                        total_secs = total,
                        "Listen reminder timeout exceeds total silence timeout"
                    );
                }
            }
            if steps.contains_key(&step.name) {
                warnings.push(DuplicateStepWarning {
                    name: step.name.clone(),
                    line: step.line,
                });
            }
            steps.insert(step.name.clone(), step);
        }

        LoadedScript {
            registry: ScriptRegistry { steps },
            warnings,
        }
    }

    /// Looks up a step by name.
    pub fn get(&self, name: &str) -> Option<&Step> {
        self.steps.get(name)
    }

    /// True if the step name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Number of distinct steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the registry holds no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All defined step names (unordered).
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }
}
