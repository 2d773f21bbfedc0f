use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: io::Error },
    /// `line` is 1-based.
    Parse { line: usize, message: String },
    /// The file parsed but contained no triangles.
    Empty,
}

impl AssetError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::Empty => f.write_str("model contains no geometry"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
