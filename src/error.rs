//! Error types and handling for `LooFinder`

use thiserror::Error;

/// Main error type for the `LooFinder` library
#[derive(Error, Debug)]
pub enum LooFinderError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup of an unknown restroom id
    #[error("Restroom not found: {id}")]
    NotFound { id: String },

    /// A platform capability (location, speech) is unavailable
    #[error("Capability unavailable: {message}")]
    Capability { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Catalog or request payload could not be parsed
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl LooFinderError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn capability<S: Into<String>>(message: S) -> Self {
        Self::Capability {
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
            LooFinderError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            LooFinderError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            LooFinderError::NotFound { id } => {
                format!("No restroom with id '{id}' is known.")
            }
            LooFinderError::Capability { .. } => {
                "This device feature is unavailable. Please check your permissions.".to_string()
            }
            LooFinderError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            LooFinderError::Json { .. } => {
                "The restroom data could not be read. Please check its format.".to_string()
            }
            LooFinderError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = LooFinderError::config("bad port");
        assert!(matches!(config_err, LooFinderError::Config { .. }));

        let validation_err = LooFinderError::validation("invalid coordinates");
        assert!(matches!(validation_err, LooFinderError::Validation { .. }));

        let not_found = LooFinderError::not_found("r-42");
        assert!(not_found.to_string().contains("r-42"));
    }

    #[test]
    fn test_user_messages() {
        let config_err = LooFinderError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = LooFinderError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let capability_err = LooFinderError::capability("geolocation denied");
        assert!(capability_err.user_message().contains("unavailable"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LooFinderError = io_err.into();
        assert!(matches!(err, LooFinderError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: LooFinderError = json_err.into();
        assert!(matches!(err, LooFinderError::Json { .. }));
    }
}
