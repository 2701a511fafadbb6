//! Script configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Script configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    /// Path to the DSL script file
    #[serde(default = "default_path")]
    pub path: String,
}

impl ScriptConfig {
    /// Validate script configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.trim().is_empty() {
            return Err(ValidationError::MissingScriptPath);
        }
        Ok(())
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "scripts/museum.dsl".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        let config = ScriptConfig {
            path: "".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingScriptPath)
        ));
    }
}
