//! Error types for Intento API operations

use thiserror::Error;

/// Prefix shared by all caller input errors
pub const ERROR_MESSAGE_PREFIX: &str = "Intento SDK:";

/// Errors surfaced by the connector
#[derive(Error, Debug)]
pub enum IntentoError {
    /// Client was built without an API key
    #[error("No Intento API key provided")]
    MissingApiKey,

    /// Malformed caller input, detected before any request is made
    #[error("Intento SDK: {message}")]
    InvalidInput {
        /// What is wrong with the input
        message: String,
    },

    /// Own credentials can not be attributed to a single provider
    #[error("Intento SDK: {message}")]
    AmbiguousAuth {
        /// What makes the auth ambiguous
        message: String,
    },

    /// Capability requires an explicit provider
    #[error("Intento SDK: please specify a provider for `{capability}`")]
    ProviderRequired {
        /// Intent id
        capability: String,
    },

    /// Intent name outside the known capability set
    #[error("Intento SDK: unknown intent `{name}`")]
    UnknownCapability {
        /// Name as given
        name: String,
    },

    /// DNS resolution failed
    #[error("Host lookup failed for {host}: {message}")]
    HostLookup {
        /// Host that failed to resolve
        host: String,
        /// Resolver message
        message: String,
    },

    /// Connection level failure
    #[error("Network error: {message}")]
    NetworkError {
        /// Underlying error message
        message: String,
    },

    /// Structured `{error: {code, message}}` reply
    #[error("API error: {status} {code:?} - {message}")]
    Api {
        /// HTTP status
        status: u16,
        /// `error.code` from the body
        code: Option<i64>,
        /// `error.message` from the body
        message: String,
        /// Full response body
        body: serde_json::Value,
    },

    /// Error status without an `error` field in the body
    #[error("HTTP error: {status} {status_message}")]
    Http {
        /// HTTP status
        status: u16,
        /// Status reason phrase
        status_message: String,
        /// Parsed body, if it was JSON
        body: Option<serde_json::Value>,
    },

    /// HTML page instead of JSON
    #[error("{}: {body}", html_kind(.status))]
    HtmlResponse {
        /// HTTP status
        status: u16,
        /// Raw body
        body: String,
    },

    /// Body is neither JSON nor HTML
    #[error("Unexpected response ({status}): {body}")]
    UnexpectedResponse {
        /// HTTP status
        status: u16,
        /// Raw body
        body: String,
    },

    /// Async operation was still running after the configured number of polls
    #[error("Operation {id} is still in progress after {attempts} polls")]
    PollingExhausted {
        /// Operation id
        id: String,
        /// Polls made
        attempts: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn html_kind(status: &u16) -> &'static str {
    match *status {
        400..=499 => "HTML 4xx response",
        500..=599 => "HTML 5xx response",
        _ => "Unexpected 2xx or 3xx response",
    }
}

impl IntentoError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        IntentoError::InvalidInput {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            IntentoError::Api { status, .. }
            | IntentoError::Http { status, .. }
            | IntentoError::HtmlResponse { status, .. }
            | IntentoError::UnexpectedResponse { status, .. } => Some(*status),
            IntentoError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for errors raised before any request was sent
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IntentoError::MissingApiKey
                | IntentoError::InvalidInput { .. }
                | IntentoError::AmbiguousAuth { .. }
                | IntentoError::ProviderRequired { .. }
                | IntentoError::UnknownCapability { .. }
        )
    }
}

/// Short explanation for the general Intento API status codes
pub fn status_hint(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Provider-related error"),
        401 => Some("Auth key is missing"),
        403 => Some("Auth key is invalid"),
        404 => Some("Intent/Provider not found"),
        413 => Some(
            "Capabilities mismatch for the chosen provider (too long text, unsupported languages, etc)",
        ),
        429 => Some("API rate limit exceeded"),
        _ => None,
    }
}

/// Result type for connector operations
pub type Result<T> = std::result::Result<T, IntentoError>;
