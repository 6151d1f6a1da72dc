use thiserror::Error;

/// Classifies list source errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Required path or format not configured
    NotConfigured,
    /// File open/read failure
    FileError,
    /// Data format or decoding error (malformed rule, bad snapshot, bad header)
    InvalidData,
}

/// PSL engine error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Unresolvable domain: {0}")]
    UnresolvableDomain(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid list source: {message}")]
    InvalidListSource {
        kind: SourceErrorKind,
        message: String,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PslError {
    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        PslError::InvalidListSource {
            kind: SourceErrorKind::InvalidData,
            message: message.into(),
        }
    }

    pub(crate) fn file_error(message: impl Into<String>) -> Self {
        PslError::InvalidListSource {
            kind: SourceErrorKind::FileError,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PslError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_kind_is_matchable() {
        let err = PslError::invalid_data("line 3: bad rule");
        match &err {
            PslError::InvalidListSource { kind, .. } => {
                assert!(matches!(kind, SourceErrorKind::InvalidData));
            }
            _ => panic!("expected InvalidListSource"),
        }
    }

    #[test]
    fn test_file_error_kind() {
        let err = PslError::file_error("Failed to open list");
        match &err {
            PslError::InvalidListSource { kind, .. } => {
                assert!(matches!(kind, SourceErrorKind::FileError));
            }
            _ => panic!("expected InvalidListSource"),
        }
    }

    #[test]
    fn test_display_includes_message() {
        let err = PslError::UnresolvableDomain("com".into());
        let display = format!("{}", err);
        assert!(display.contains("com"), "got: {}", display);

        let err = PslError::invalid_data("truncated snapshot");
        assert_eq!(err.to_string(), "Invalid list source: truncated snapshot");
    }
}
