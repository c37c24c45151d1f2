/// Core error types for the Frost scene compiler.

/// A specialized Result type for Frost operations.
pub type FrostResult<T> = Result<T, FrostError>;

/// Top-level error type encompassing all Frost subsystems.
#[derive(Debug, thiserror::Error)]
pub enum FrostError {
    #[error("parse error: {message} at {file}:{line}")]
    Parse {
        message: String,
        file: String,
        line: usize,
    },

    /// The node definition catalog is malformed. Raised while building a
    /// registry, never by user input.
    #[error("registry error: {0}")]
    Registry(String),

    #[error("codegen error: {0}")]
    Codegen(String),

    #[error("tree validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FrostError {
    /// Create a parse error with source location.
    pub fn parse(message: impl Into<String>, file: impl Into<String>, line: usize) -> Self {
        FrostError::Parse {
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// Create a codegen error.
    pub fn codegen(message: impl Into<String>) -> Self {
        FrostError::Codegen(message.into())
    }

    /// Create a registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        FrostError::Registry(message.into())
    }

    /// Line of the offending token, for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            FrostError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = FrostError::parse("endnode without node", "scene.frost", 3);
        assert_eq!(
            err.to_string(),
            "parse error: endnode without node at scene.frost:3"
        );
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_codegen_error_display() {
        let err = FrostError::codegen("SDF3D:sphere used in a 2D context");
        assert!(err.to_string().starts_with("codegen error:"));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FrostError = io.into();
        assert!(matches!(err, FrostError::Io(_)));
    }
}
