use serde::Deserialize;

use crate::models::{DocId, DocumentationRecord};

/// Failures surfaced by the documentation client. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (no status) or a non-2xx answer from the backend.
    #[error("{}", describe_failure(.status, .message))]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("documentation not found with id: {0}")]
    NotFound(DocId),

    /// A required generate field was empty or whitespace-only.
    #[error("{0} must not be empty")]
    InvalidInput(&'static str),

    #[error("malformed response payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The mutation reached the backend, but re-fetching the library afterwards
    /// failed. Held state is stale until the next successful refresh.
    #[error("{mutation}, but refreshing the library failed: {source}")]
    RefreshFailed {
        mutation: Mutation,
        source: Box<ClientError>,
    },
}

/// A mutation the backend has already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Generated(Box<DocumentationRecord>),
    Deleted(DocId),
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Generated(record) => write!(f, "documentation {} was generated", record.id),
            Mutation::Deleted(id) => write!(f, "documentation {} was deleted", id),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => *status,
            ClientError::NotFound(_) => Some(404),
            ClientError::RefreshFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Builds a `RequestFailed` from a non-2xx status and whatever body came back.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        ClientError::RequestFailed {
            status: Some(status),
            message: backend_message(body),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::RequestFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn describe_failure(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("request failed with status {}: {}", code, message),
        None => format!("request failed: {}", message),
    }
}

/// The backend's error envelope: `{timestamp, status, error, message, path}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}

fn backend_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.message.or(envelope.error) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}
