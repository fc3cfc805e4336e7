//! Error types and handling for the `ClimateWatch` backend

use thiserror::Error;

/// Main error type for the `ClimateWatch` backend
#[derive(Error, Debug)]
pub enum ClimateWatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport failures: connection refused, DNS, timeouts
    #[error("Network error: {message}")]
    Network { message: String },

    /// Provider answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider answered with a payload we cannot use
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl ClimateWatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new API status error
    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than by us
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateWatchError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ClimateWatchError::Network { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            ClimateWatchError::Api { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later.".to_string()
            }
            ClimateWatchError::Api { .. } | ClimateWatchError::Parse { .. } => {
                "Received an unexpected response from an external service.".to_string()
            }
            ClimateWatchError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}

impl From<reqwest::Error> for ClimateWatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::api(status.as_u16(), err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClimateWatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ClimateWatchError::config("missing API key");
        assert!(matches!(config_err, ClimateWatchError::Config { .. }));

        let api_err = ClimateWatchError::api(503, "unavailable");
        assert!(matches!(api_err, ClimateWatchError::Api { status: 503, .. }));

        let validation_err = ClimateWatchError::validation("invalid coordinates");
        assert!(validation_err.is_validation());
    }

    #[test]
    fn test_user_messages() {
        let config_err = ClimateWatchError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let network_err = ClimateWatchError::network("test");
        assert!(network_err.user_message().contains("Unable to connect"));

        let server_err = ClimateWatchError::api(502, "bad gateway");
        assert!(server_err.user_message().contains("try again later"));

        let client_err = ClimateWatchError::api(404, "not found");
        assert!(client_err.user_message().contains("unexpected response"));

        let validation_err = ClimateWatchError::validation("latitude 91 out of range");
        assert!(validation_err.user_message().contains("latitude 91"));
    }

    #[test]
    fn test_only_validation_is_caller_error() {
        let errors = [
            ClimateWatchError::config("c"),
            ClimateWatchError::network("n"),
            ClimateWatchError::api(500, "a"),
            ClimateWatchError::parse("p"),
            ClimateWatchError::validation("v"),
        ];
        let caller: Vec<_> = errors.iter().map(ClimateWatchError::is_validation).collect();
        assert_eq!(caller, vec![false, false, false, false, true]);
        assert!(errors.iter().all(|e| !e.user_message().is_empty()));
    }

    #[test]
    fn test_display_includes_status() {
        let err = ClimateWatchError::api(401, "Invalid API key");
        assert_eq!(err.to_string(), "API error (401): Invalid API key");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ClimateWatchError = json_err.into();
        assert!(matches!(err, ClimateWatchError::Parse { .. }));
    }
}
