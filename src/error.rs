//! Error types and handling for the `skywatch` dashboard service

use thiserror::Error;

/// Main error type for the `skywatch` application
#[derive(Error, Debug)]
pub enum SkywatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream API communication errors
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl SkywatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream API error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkywatchError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkywatchError::Upstream { .. } => {
                "Unable to reach the upstream weather services. The dashboard will show partial data."
                    .to_string()
            }
            SkywatchError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkywatchError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            SkywatchError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SkywatchError::config("missing static dir");
        assert!(matches!(config_err, SkywatchError::Config { .. }));

        let upstream_err = SkywatchError::upstream("connection failed");
        assert!(matches!(upstream_err, SkywatchError::Upstream { .. }));

        let validation_err = SkywatchError::validation("invalid coordinates");
        assert!(matches!(validation_err, SkywatchError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = SkywatchError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let upstream_err = SkywatchError::upstream("test");
        assert!(upstream_err.user_message().contains("partial data"));

        let validation_err = SkywatchError::validation("bad latitude");
        assert!(validation_err.user_message().contains("bad latitude"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sky_err: SkywatchError = io_err.into();
        assert!(matches!(sky_err, SkywatchError::Io { .. }));
    }
}
