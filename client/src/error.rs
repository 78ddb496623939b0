use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {source}")]
    NetworkError {
        #[from]
        source: reqwest::Error,
    },

    // Non-2xx response. `message` is whatever `{message|error}` the body carried.
    #[error("Server error (HTTP {status}): {}", .message.as_deref().unwrap_or("no details"))]
    ServerError { status: u16, message: Option<String> },

    #[error("Response decode error: {0}")]
    DecodeError(String),

    // A 2xx response whose envelope said `success: false`.
    #[error("Request rejected: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected { message: Option<String> },

    // Raised before any request is sent.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV export error: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Text to show the user: the backend's or the validator's own message
    /// when there is one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        let specific = match self {
            ClientError::ServerError { message, .. } | ClientError::Rejected { message } => {
                message.as_deref()
            }
            ClientError::ValidationError(msg) => Some(msg.as_str()),
            _ => None,
        };
        match specific {
            Some(msg) if !msg.trim().is_empty() => msg.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ServerError { status, .. } => Some(*status),
            ClientError::NetworkError { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::ServerError {
            status: 422,
            message: Some("Branch code already exists".to_string()),
        };
        assert_eq!(err.user_message("Failed to save branch"), "Branch code already exists");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::ServerError { status: 500, message: None };
        assert_eq!(err.user_message("Failed to load vendors"), "Failed to load vendors");

        let blank = ClientError::Rejected { message: Some("  ".to_string()) };
        assert_eq!(blank.user_message("Failed"), "Failed");

        assert_eq!(ClientError::Unauthenticated.user_message("Please sign in"), "Please sign in");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = ClientError::ValidationError("Username is required".to_string());
        assert_eq!(err.user_message("Login failed"), "Username is required");
    }

    #[test]
    fn test_display_includes_status() {
        let err = ClientError::ServerError { status: 404, message: None };
        assert_eq!(err.to_string(), "Server error (HTTP 404): no details");
    }
}
