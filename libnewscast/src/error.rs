//! Error types for Newscast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NewscastError>;

#[derive(Error, Debug)]
pub enum NewscastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NewscastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NewscastError::InvalidInput(_) => 3,
            NewscastError::Platform(PlatformError::Authentication(_)) => 2,
            NewscastError::Platform(_) => 1,
            NewscastError::Config(_) => 1,
            NewscastError::State(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Persisted-state failures. These are never swallowed: a bot running
/// without its dedup set or ledger would double-post, so callers propagate
/// them and let the process die visibly.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("State file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = NewscastError::InvalidInput("Empty content".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let error = NewscastError::Platform(PlatformError::Authentication(
            "Missing token".to_string(),
        ));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_posting_error() {
        let error = NewscastError::Platform(PlatformError::Posting("Bad request".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_state_error() {
        let error = NewscastError::State(StateError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        )));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = NewscastError::Config(ConfigError::MissingField("state.dedup_file".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_platform() {
        let error = NewscastError::Platform(PlatformError::Network("Connection refused".to_string()));
        assert_eq!(
            format!("{}", error),
            "Platform error: Network error: Connection refused"
        );
    }

    #[test]
    fn test_error_message_formatting_state() {
        let error = NewscastError::State(StateError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )));
        let message = format!("{}", error);
        assert!(message.contains("State error"));
        assert!(message.contains("I/O failed"));
    }

    #[test]
    fn test_error_conversion_from_state_error() {
        let state_error = StateError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let error: NewscastError = state_error.into();
        assert!(matches!(error, NewscastError::State(_)));
    }

    #[test]
    fn test_error_conversion_from_platform_error() {
        let platform_error = PlatformError::Posting("test".to_string());
        let error: NewscastError = platform_error.into();
        assert!(matches!(error, NewscastError::Platform(_)));
    }

    #[test]
    fn test_platform_error_clone() {
        let original = PlatformError::Network("Connection failed".to_string());
        let cloned = original.clone();
        assert_eq!(format!("{}", original), format!("{}", cloned));
    }
}
