//! Error types for the Gemini client.

use thiserror::Error;

/// Result type alias for Gemini operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Gemini operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The API answered with a non-success status.
    #[error("Gemini API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    crate::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    crate::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    crate::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => crate::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Status { status, message } => {
                let error = match status {
                    401 | 403 => crate::Error::authentication(),
                    429 => crate::Error::rate_limited(),
                    500..=599 => crate::Error::service_unavailable(),
                    _ => crate::Error::external_error(),
                };
                error.with_message(format!("Gemini API returned {status}: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use docflow_core::ErrorKind;

    use super::*;

    fn kind(status: u16) -> ErrorKind {
        crate::Error::from(Error::Status {
            status,
            message: "failure".into(),
        })
        .kind()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(kind(401), ErrorKind::Authentication);
        assert_eq!(kind(403), ErrorKind::Authentication);
        assert_eq!(kind(429), ErrorKind::RateLimited);
        assert_eq!(kind(500), ErrorKind::ServiceUnavailable);
        assert_eq!(kind(503), ErrorKind::ServiceUnavailable);
        assert_eq!(kind(400), ErrorKind::ExternalError);
        assert_eq!(kind(404), ErrorKind::ExternalError);
    }
}
