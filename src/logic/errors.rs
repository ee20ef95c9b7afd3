use anyhow::Error;

use crate::error::ApiError;

/// Shown whenever the server gave no usable message
pub const NETWORK_ERROR_MESSAGE: &str = "Terjadi kesalahan jaringan. Silakan coba lagi.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    Unauthorized, // HTTP 401
    Validation,   // HTTP 422
    NotFound,     // HTTP 404
    ServerError,  // HTTP 500+
    ConnectionRefused,
    Timeout,
    NetworkError, // DNS, routing, etc.
    Other,
}

/// Classify an API error by status code, then by transport failure
pub fn classify_error(error: &ApiError) -> ErrorType {
    match error {
        ApiError::Unauthorized { .. } => return ErrorType::Unauthorized,
        ApiError::Validation { .. } => return ErrorType::Validation,
        ApiError::Rejected { status, .. } => {
            return match status {
                401 => ErrorType::Unauthorized,
                404 => ErrorType::NotFound,
                422 => ErrorType::Validation,
                500..=599 => ErrorType::ServerError,
                _ => ErrorType::Other,
            }
        }
        _ => {}
    }

    if let ApiError::Transport(reqwest_err) = error {
        if reqwest_err.is_timeout() {
            return ErrorType::Timeout;
        }
    }

    // reqwest hides the io error kind behind its own message, so match the chain text
    let error_msg = format_error_chain(error).to_lowercase();
    if error_msg.contains("connection refused") {
        return ErrorType::ConnectionRefused;
    }
    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        return ErrorType::Timeout;
    }
    if error_msg.contains("dns") || error_msg.contains("network") || error_msg.contains("connect")
    {
        return ErrorType::NetworkError;
    }

    ErrorType::Other
}

/// A 401 on any request ends the session
pub fn requires_logout(error: &ApiError) -> bool {
    classify_error(error) == ErrorType::Unauthorized
}

/// Message for the error toast
///
/// The server's own message wins (for 422 that is the first field error);
/// everything else falls back to the generic network error.
///
/// # Examples
/// ```
/// use wargatui::error::ApiError;
/// use wargatui::logic::errors::{user_message, NETWORK_ERROR_MESSAGE};
///
/// let err = ApiError::Validation { message: "NIK harus 16 digit".into() };
/// assert_eq!(user_message(&err), "NIK harus 16 digit");
///
/// assert_eq!(user_message(&ApiError::MissingData), NETWORK_ERROR_MESSAGE);
/// ```
pub fn user_message(error: &ApiError) -> String {
    error
        .server_message()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NETWORK_ERROR_MESSAGE.to_string())
}

fn format_error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(err) = source {
        parts.push(err.to_string());
        source = err.source();
    }
    parts.join(": ")
}

/// Format an application error for the log - show the root cause
pub fn format_error_message(error: &Error) -> String {
    // Walk the error chain to find reqwest::Error (most informative for network errors)
    let mut current: Option<&dyn std::error::Error> = Some(error.as_ref());

    while let Some(err) = current {
        if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>() {
            return reqwest_err.to_string();
        }
        current = err.source();
    }

    error.root_cause().to_string()
}
