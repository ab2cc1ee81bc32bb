//! Error types and handling for the `geofinder` pipeline

use thiserror::Error;

/// Failure of a single provider lookup (geocode, reverse geocode, weather)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Transport-level failure: unreachable host, timeout, non-success status
    #[error("Network error: {message}")]
    Network { message: String },

    /// The provider answered but the response did not have the expected shape
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A committed query resolved to a well-formed but empty result set
    #[error("No administrative boundaries found for '{query}'")]
    NoResults { query: String },
}

impl LookupError {
    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new no-results error
    pub fn no_results<S: Into<String>>(query: S) -> Self {
        Self::NoResults {
            query: query.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LookupError::Network { .. } => {
                "Unable to reach the lookup service. Please check your internet connection."
                    .to_string()
            }
            LookupError::Parse { .. } => {
                "The lookup service returned an unexpected response.".to_string()
            }
            LookupError::NoResults { .. } => "No administrative boundaries found.".to_string(),
        }
    }
}

impl From<reqwest_middleware::Error> for LookupError {
    fn from(err: reqwest_middleware::Error) -> Self {
        LookupError::network(err.to_string())
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::parse(err.to_string())
        } else {
            LookupError::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::parse(err.to_string())
    }
}

/// Application-level error type for `geofinder`
#[derive(Error, Debug)]
pub enum GeofinderError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Provider lookup errors
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GeofinderError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GeofinderError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            GeofinderError::Lookup(err) => err.user_message(),
            GeofinderError::Io { .. } => {
                "Terminal I/O failed. Please check the console you are running in.".to_string()
            }
        }
    }
}
