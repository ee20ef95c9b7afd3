//! Errors returned by the REST client

use thiserror::Error;

/// Failure of a single API call
///
/// HTTP status codes the UI reacts to get their own variants: 401 forces a
/// logout and 422 carries the first validation message from the server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("response envelope carried no data")]
    MissingData,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status of the response, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Validation { .. } => Some(422),
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message sent by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Rejected { message, .. } => {
                message.as_deref()
            }
            ApiError::Validation { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_http_variants() {
        assert_eq!(ApiError::Unauthorized { message: None }.status(), Some(401));
        assert_eq!(
            ApiError::Validation { message: "x".into() }.status(),
            Some(422)
        );
        assert_eq!(
            ApiError::Rejected { status: 404, message: None }.status(),
            Some(404)
        );
        assert_eq!(ApiError::MissingData.status(), None);
    }

    #[test]
    fn test_display_includes_server_message() {
        let err = ApiError::Rejected {
            status: 500,
            message: Some("Server sibuk".into()),
        };
        assert_eq!(err.to_string(), "request rejected (500): Server sibuk");

        let err = ApiError::Unauthorized { message: None };
        assert_eq!(err.to_string(), "unauthorized: session expired");
    }

    #[test]
    fn test_server_message() {
        let err = ApiError::Validation {
            message: "NIK harus 16 digit".into(),
        };
        assert_eq!(err.server_message(), Some("NIK harus 16 digit"));
        assert_eq!(ApiError::MissingData.server_message(), None);
    }
}
