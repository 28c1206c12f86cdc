use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures while reading scheduler input from disk.
#[derive(Debug)]
pub enum LoadError {
    MissingResource { path: PathBuf, source: io::Error },
    MalformedInput { path: PathBuf, line: usize, reason: String },
}

impl LoadError {
    pub(crate) fn malformed(
        path: &std::path::Path,
        line: usize,
        reason: impl Into<String>,
    ) -> LoadError {
        LoadError::MalformedInput {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::MissingResource { .. })
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::MissingResource { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            LoadError::MalformedInput { path, line, reason } => {
                write!(f, "{}:{}: {}", path.display(), line, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::MissingResource { source, .. } => Some(source),
            LoadError::MalformedInput { .. } => None,
        }
    }
}
