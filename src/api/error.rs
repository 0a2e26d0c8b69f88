use reqwest::StatusCode;
use thiserror::Error;

pub(crate) const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";
pub(crate) const SERVER_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";
pub(crate) const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 400 with field-level messages, already joined into a display string.
    #[error("{message}")]
    Validation {
        url: String,
        fields: Vec<(String, String)>,
        message: String,
    },

    #[error("Internal server error. Please try again later.")]
    Server { url: String, status: StatusCode },

    #[error("{message}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        message: String,
    },

    #[error("Network error. Please check your connection and try again.")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Request to {0} timed out")]
    Timeout(String, #[source] reqwest::Error),

    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build request for {0}")]
    RequestBuild(String, #[source] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl ApiError {
    /// Classifies a non-success response the way the user should see it.
    pub(crate) fn from_response(url: String, status: StatusCode, body: &[u8]) -> Self {
        if status == StatusCode::BAD_REQUEST {
            if let Some(fields) = field_errors(body).filter(|f| !f.is_empty()) {
                let message = join_field_errors(&fields);
                return ApiError::Validation {
                    url,
                    fields,
                    message,
                };
            }
        }
        if status.is_server_error() {
            return ApiError::Server { url, status };
        }
        ApiError::HttpStatus {
            url,
            status,
            message: body_message(body),
        }
    }

    /// Maps a transport-level reqwest failure (no response received).
    pub(crate) fn from_transport(url: String, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout(url, error)
        } else {
            ApiError::NetworkRequest(url, error)
        }
    }

    /// The message to surface in a blocking alert or inline error text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { .. } => SERVER_ERROR_MESSAGE.to_string(),
            ApiError::Timeout(..) | ApiError::NetworkRequest(..) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
            ApiError::Decode { .. }
            | ApiError::RequestBuild(..)
            | ApiError::UnexpectedStatus { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Validation { .. } => Some(StatusCode::BAD_REQUEST),
            ApiError::Server { status, .. }
            | ApiError::HttpStatus { status, .. }
            | ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout(..))
    }

    /// `true` for 401/403, i.e. the stored token is no longer accepted.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

/// Composes the display message for a failed response.
///
/// ```
/// use flood_alert::compose_error_message;
/// use reqwest::StatusCode;
///
/// let msg = compose_error_message(StatusCode::BAD_REQUEST, br#"{"username": ["required"]}"#);
/// assert_eq!(msg, "username: required");
/// ```
pub fn compose_error_message(status: StatusCode, body: &[u8]) -> String {
    ApiError::from_response(String::new(), status, body).to_string()
}

/// Extracts `field -> [messages]` pairs from a 400 body, in server order. Only array
/// values are field errors; a bare `{"detail": "..."}` is a plain message.
fn field_errors(body: &[u8]) -> Option<Vec<(String, String)>> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;
    let mut fields = Vec::new();
    for (key, messages) in object {
        if let serde_json::Value::Array(items) = messages {
            for item in items {
                if let Some(text) = item.as_str() {
                    fields.push((key.clone(), text.to_string()));
                }
            }
        }
    }
    Some(fields)
}

fn join_field_errors(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(key, message)| format!("{key}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn body_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return GENERIC_ERROR_MESSAGE.to_string();
    }
    // Prefer a `detail`/`message` field when the body is JSON.
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(text) {
        for key in ["detail", "message", "error"] {
            if let Some(serde_json::Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_error() {
        let msg = compose_error_message(StatusCode::BAD_REQUEST, br#"{"username": ["required"]}"#);
        assert_eq!(msg, "username: required");
    }

    #[test]
    fn test_multiple_field_errors_keep_server_order() {
        let body = br#"{
            "username": ["A user with that username already exists."],
            "password": ["This password is too short.", "This password is too common."]
        }"#;
        let msg = compose_error_message(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            msg,
            "username: A user with that username already exists.\n\
             password: This password is too short.\n\
             password: This password is too common."
        );
    }

    #[test]
    fn test_server_errors_are_generic() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert_eq!(
                compose_error_message(status, b"<html>stack trace</html>"),
                SERVER_ERROR_MESSAGE
            );
        }
    }

    #[test]
    fn test_other_statuses_use_body() {
        assert_eq!(
            compose_error_message(StatusCode::UNAUTHORIZED, br#"{"detail": "Invalid token."}"#),
            "Invalid token."
        );
        assert_eq!(
            compose_error_message(StatusCode::NOT_FOUND, b"Not found"),
            "Not found"
        );
        assert_eq!(
            compose_error_message(StatusCode::FORBIDDEN, b""),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_bad_request_without_field_map_falls_back_to_body() {
        assert_eq!(
            compose_error_message(StatusCode::BAD_REQUEST, b"bad input"),
            "bad input"
        );
    }

    #[test]
    fn test_bad_request_detail_is_not_a_field_error() {
        let body = br#"{"detail": "Invalid credentials"}"#;
        assert_eq!(
            compose_error_message(StatusCode::BAD_REQUEST, body),
            "Invalid credentials"
        );
        let err = ApiError::from_response(String::new(), StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, ApiError::HttpStatus { .. }));

        // Array values next to a plain string still count as field errors.
        let body = br#"{"detail": "ignored", "password": ["too short"]}"#;
        assert_eq!(
            compose_error_message(StatusCode::BAD_REQUEST, body),
            "password: too short"
        );
    }

    #[test]
    fn test_status_and_unauthorized() {
        let err = ApiError::from_response(
            "https://example.test/api/user/me".into(),
            StatusCode::UNAUTHORIZED,
            b"",
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
