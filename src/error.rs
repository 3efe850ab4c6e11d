use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] Failure),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    EnvVar(#[from] EnvVarError),
}

/// Why a single request to the provider did not produce a JSON value.
#[derive(thiserror::Error, Debug)]
pub enum Failure {
    #[error("Request timed out after {after:?}.")]
    Timeout { after: Duration },

    #[error("Connection failed. Please check your internet connection. ({0})")]
    ConnectionFailed(String),

    #[error("{}", status_message(.code, .details))]
    HttpStatus { code: u16, details: String },

    #[error("Invalid JSON response from API. ({0})")]
    MalformedResponse(String),

    #[error("base_url not configured. Call configure() first.")]
    Unconfigured,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

const STATUS_MESSAGES: &[(u16, &str)] = &[
    (
        400,
        "Bad Request - The request was malformed or missing required parameters.",
    ),
    (401, "Unauthorized - Invalid or missing API key."),
    (
        403,
        "Forbidden - Access denied. Check rate limits or permissions.",
    ),
    (404, "Not Found - The requested resource could not be found."),
    (
        429,
        "Too Many Requests - Rate limit exceeded. Please wait before retrying.",
    ),
    (500, "Internal Server Error - Server error occurred."),
    (
        503,
        "Service Unavailable - The API is temporarily unavailable.",
    ),
];

/// Fixed description for the well-known status codes.
pub fn known_status_message(code: u16) -> Option<&'static str> {
    STATUS_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, message)| *message)
}

// unmapped codes carry the raw error details
fn status_message(code: &u16, details: &str) -> String {
    match known_status_message(*code) {
        Some(message) => message.to_string(),
        None => format!("HTTP Error {code}\nDetails: {details}"),
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{what} is required.")]
    Missing { what: &'static str },

    #[error("Invalid input. {what} should be numeric.")]
    NotNumeric { what: &'static str },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("invalid header {name}")]
    InvalidHeader { name: String },

    #[error("{var} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({var})")]
pub struct EnvVarError {
    var: String,
    #[source]
    source: std::env::VarError,
}

impl EnvVarError {
    pub fn new(var: &str, source: std::env::VarError) -> Self {
        Self {
            var: var.into(),
            source,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_known_status_maps_to_table_text() {
        let failure = Failure::HttpStatus {
            code: 404,
            details: "404 Not Found for url (http://localhost/x)".into(),
        };
        assert_eq!(
            failure.to_string(),
            "Not Found - The requested resource could not be found."
        );
        assert_eq!(
            known_status_message(429),
            Some("Too Many Requests - Rate limit exceeded. Please wait before retrying.")
        );
    }

    #[test]
    fn test_unknown_status_keeps_details() {
        let failure = Failure::HttpStatus {
            code: 418,
            details: "HTTP status client error (418 I'm a teapot)".into(),
        };
        let message = failure.to_string();
        assert!(message.starts_with("HTTP Error 418"));
        assert!(message.contains("I'm a teapot"));
        assert_eq!(known_status_message(418), None);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::Missing { what: "Event ID" }.to_string(),
            "Event ID is required."
        );
        assert_eq!(
            ValidationError::NotNumeric { what: "Driver ID" }.to_string(),
            "Invalid input. Driver ID should be numeric."
        );
    }

    #[test]
    fn test_timeout_message() {
        let failure = Failure::Timeout {
            after: Duration::from_secs(10),
        };
        assert_eq!(failure.to_string(), "Request timed out after 10s.");
    }
}
