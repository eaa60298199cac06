//! Error types for the AppDynamics controller client.

use thiserror::Error;

/// Base error type for controller operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required identifying parameter (e.g. an application id) is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// A "find by" lookup matched nothing.
    #[error("Not found: {key}")]
    NotFound { key: String },

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Connection, TLS or body transfer failure below the HTTP status level.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}

/// Raised when a value falls outside what the controller accepts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{attribute} must be one of [{choices}] but got {value}", choices = .allowed.join(", "))]
    InvalidEnumValue {
        attribute: &'static str,
        allowed: &'static [&'static str],
        value: String,
    },

    /// Invalid combination of time-range parameters.
    #[error("{0}")]
    TimeRange(String),
}

/// Raised when a JSON payload does not fit the expected model.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{type_name}: missing field `{field}`")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("{attribute}: expected {expected}, found {found}")]
    InvalidType {
        attribute: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{type_name} has no attribute `{attribute}`")]
    UnknownAttribute {
        type_name: &'static str,
        attribute: &'static str,
    },

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("expected a JSON array, found {0}")]
    NotAnArray(&'static str),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raised when the controller answers with a non-2xx status.
#[derive(Error, Debug, Clone)]
#[error("HTTP {status_code} for {url}")]
pub struct HttpError {
    pub status_code: u16,
    pub url: String,
    pub body: Option<String>,
}

impl HttpError {
    pub fn new(status_code: u16, url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            status_code,
            url: url.into(),
            body,
        }
    }

    /// True when the controller rejected the credentials (wrong user, account or password).
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_error_names_attribute_allowed_set_and_value() {
        let err = ValidationError::InvalidEnumValue {
            attribute: "agent_type",
            allowed: &["APP_AGENT", "MACHINE_AGENT"],
            value: "JAVA_AGENT".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "agent_type must be one of [APP_AGENT, MACHINE_AGENT] but got JAVA_AGENT"
        );
    }

    #[test]
    fn http_error_reports_status_and_url() {
        let err = HttpError::new(401, "http://localhost:8090/controller/rest/applications", None);
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("/controller/rest/applications"));
    }
}
