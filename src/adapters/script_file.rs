//! Filesystem script source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::{ScriptSource, ScriptSourceError};

/// Reads script text from a file on disk.
#[derive(Debug, Clone)]
pub struct FileScriptSource {
    path: PathBuf,
}

impl FileScriptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScriptSource for FileScriptSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String, ScriptSourceError> {
        std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScriptSourceError::NotFound {
                location: self.location(),
            },
            _ => ScriptSourceError::Io {
                location: self.location(),
                reason: e.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_script_text_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Step welcome\n  Speak \"您好\"\n  Exit").unwrap();

        let source = FileScriptSource::new(file.path());
        let text = source.read().unwrap();

        assert!(text.contains("Step welcome"));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let source = FileScriptSource::new("/nonexistent/flow.dsl");
        let err = source.read().unwrap_err();
        assert!(matches!(err, ScriptSourceError::NotFound { .. }));
    }
}
