use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("A generation is already in flight")]
    SessionBusy,
}

impl GenerationError {
    pub fn is_network(&self) -> bool {
        matches!(self, GenerationError::NetworkError(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, GenerationError::DecodeError(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::NetworkError(err.to_string())
    }
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        GenerationError::PersistenceError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = GenerationError::NetworkError("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert!(err.is_network());
        assert!(!err.is_decode());

        let err = GenerationError::DecodeError("missing url".into());
        assert_eq!(err.to_string(), "Decode error: missing url");
        assert!(err.is_decode());
    }

    #[test]
    fn test_io_error_maps_to_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: GenerationError = io.into();
        assert!(matches!(err, GenerationError::PersistenceError(_)));
    }
}
