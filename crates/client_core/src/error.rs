use std::fmt;

use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// One failed client-side check on a form draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_text(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    pub fn require<T>(&mut self, field: &'static str, value: &Option<T>) {
        if value.is_none() {
            self.push(field, "is required");
        }
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|err| err.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|err| format!("{} {}", err.field, err.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct SchemaError {
    pub field: &'static str,
    pub message: String,
}

impl SchemaError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Validation,
    NotFound,
    Schema,
    Server,
    Cancelled,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} was not found")]
    NotFound { path: String },
    #[error("{path} returned status {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
        body: Option<ApiError>,
    },
    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed response from {path}: {source}")]
    Schema {
        path: String,
        #[source]
        source: SchemaError,
    },
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid endpoint {path}: {source}")]
    Endpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request was superseded")]
    Cancelled,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport { .. } | GatewayError::Endpoint { .. } => ErrorKind::Transport,
            GatewayError::NotFound { .. } => ErrorKind::NotFound,
            GatewayError::Status { body, status, .. } => {
                let code = body.as_ref().map(|body| body.code);
                match code {
                    Some(ErrorCode::Validation) => ErrorKind::Validation,
                    Some(ErrorCode::NotFound) => ErrorKind::NotFound,
                    _ if *status == 400 || *status == 422 => ErrorKind::Validation,
                    _ => ErrorKind::Server,
                }
            }
            GatewayError::Decode { .. } | GatewayError::Schema { .. } => ErrorKind::Schema,
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Message shown to users; structured codes stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Transport { .. } | GatewayError::Endpoint { .. } => {
                "Server unreachable; check the connection and try again.".to_string()
            }
            GatewayError::NotFound { .. } => "The requested record no longer exists.".to_string(),
            GatewayError::Status { message, .. } => message.clone(),
            GatewayError::Decode { .. } | GatewayError::Schema { .. } => {
                "The server sent data this page cannot display.".to_string()
            }
            GatewayError::Validation(errors) => format!("Please fix the form: {errors}."),
            GatewayError::Cancelled => "Request was superseded.".to_string(),
        }
    }
}
