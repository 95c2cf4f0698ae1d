//! Directory API client error types.

use serde::Deserialize;

/// Errors from directory API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The backend returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The backend rejected the credentials or the session token (401).
    #[error("{endpoint} rejected the session: {body}")]
    Unauthorized { endpoint: String, body: String },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// A request URL could not be built from the base URL.
    #[error("cannot build URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// FastAPI error body: `{"detail": "..."}`, or a list of field errors on 422.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldDetail>),
}

#[derive(Deserialize)]
struct FieldDetail {
    msg: String,
}

impl ApiError {
    /// HTTP status code, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Human-readable `detail` extracted from the backend's error body.
    pub fn detail(&self) -> Option<String> {
        let body = match self {
            Self::Status { body, .. } | Self::Unauthorized { body, .. } => body,
            _ => return None,
        };
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail {
            Detail::Message(msg) => Some(msg),
            Detail::Fields(fields) if !fields.is_empty() => Some(
                fields
                    .into_iter()
                    .map(|f| f.msg)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Detail::Fields(_) => None,
        }
    }

    /// Message for an operator notification: the backend's `detail` when it
    /// sent one, otherwise the full error.
    pub fn user_message(&self) -> String {
        self.detail().unwrap_or_else(|| self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, body: &str) -> ApiError {
        ApiError::Status {
            endpoint: "POST /factories/".to_string(),
            status: code,
            body: body.to_string(),
        }
    }

    #[test]
    fn detail_extracts_message() {
        let err = status(400, r#"{"detail":"Предприятие с таким ИНН уже введено!"}"#);
        assert_eq!(err.detail().as_deref(), Some("Предприятие с таким ИНН уже введено!"));
        assert_eq!(err.user_message(), "Предприятие с таким ИНН уже введено!");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn detail_joins_validation_errors() {
        let err = status(
            422,
            r#"{"detail":[{"loc":["body","inn"],"msg":"field required","type":"missing"},
                          {"loc":["body","name"],"msg":"field required","type":"missing"}]}"#,
        );
        assert_eq!(err.detail().as_deref(), Some("field required; field required"));
    }

    #[test]
    fn non_json_body_falls_back_to_display() {
        let err = status(500, "Internal Server Error");
        assert_eq!(err.detail(), None);
        let msg = err.user_message();
        assert!(msg.contains("500"));
        assert!(msg.contains("POST /factories/"));
    }

    #[test]
    fn unauthorized_reports_401() {
        let err = ApiError::Unauthorized {
            endpoint: "GET /auth/me".to_string(),
            body: r#"{"detail":"Invalid token"}"#.to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail().as_deref(), Some("Invalid token"));
    }
}
