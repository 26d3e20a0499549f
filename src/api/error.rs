use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}{}", .message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status { status: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Error body shape used by the backend: `{"error": "..."}`, occasionally
/// `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty());
        ApiError::Status { status, message }
    }

    /// Text for a toast: the server's own message when it sent one, otherwise
    /// the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_reads_error_field() {
        let err = ApiError::from_status(400, r#"{"error": "Not enough questions"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                message: Some("Not enough questions".to_string())
            }
        );
        assert_eq!(err.user_message("fallback"), "Not enough questions");
        assert_eq!(err.to_string(), "server returned 400: Not enough questions");
    }

    #[test]
    fn test_from_status_reads_message_field() {
        let err = ApiError::from_status(404, r#"{"message": "Exam not found"}"#);
        assert_eq!(err.user_message("fallback"), "Exam not found");
    }

    #[test]
    fn test_from_status_without_json_body_uses_fallback() {
        let err = ApiError::from_status(500, "<html>Internal Server Error</html>");
        assert_eq!(err.user_message("Failed to generate questions"), "Failed to generate questions");
        assert_eq!(err.to_string(), "server returned 500");
    }

    #[test]
    fn test_transport_and_decode_use_fallback() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message("Failed to load exams"), "Failed to load exams");

        let err = ApiError::Decode("expected value".to_string());
        assert_eq!(err.user_message("Failed to load exams"), "Failed to load exams");
    }
}
