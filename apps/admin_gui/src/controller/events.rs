//! Backend results delivered to the UI thread, and error modeling for display.

use client_core::{ConfigError, ErrorKind, FetchOutcome, GatewayError, Resource};
use shared::protocol::DashboardCounts;

pub enum UiEvent<R: Resource> {
    Fetched(FetchOutcome<R>),
    Saved(Result<R::Record, GatewayError>),
    Deleted {
        id: R::Id,
        result: Result<(), GatewayError>,
    },
}

pub enum DashboardEvent {
    Loaded(Result<DashboardCounts, GatewayError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Config,
    Startup,
    Transport,
    Validation,
    NotFound,
    Schema,
    Server,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn from_config(err: &ConfigError) -> Self {
        Self {
            category: UiErrorCategory::Config,
            message: format!("{err}"),
        }
    }

    pub fn from_gateway(err: &GatewayError) -> Self {
        let category = match err.kind() {
            ErrorKind::Transport | ErrorKind::Cancelled => UiErrorCategory::Transport,
            ErrorKind::Validation => UiErrorCategory::Validation,
            ErrorKind::NotFound => UiErrorCategory::NotFound,
            ErrorKind::Schema => UiErrorCategory::Schema,
            ErrorKind::Server => UiErrorCategory::Server,
        };
        Self {
            category,
            message: err.user_message(),
        }
    }

    /// A failure to bring up the network worker or HTTP client.
    pub fn startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Startup,
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Config => "e-Report Admin is not configured",
            UiErrorCategory::Startup => "e-Report Admin cannot start",
            UiErrorCategory::Transport => "API unreachable",
            UiErrorCategory::Validation => "Rejected by the server",
            UiErrorCategory::NotFound => "Not found",
            UiErrorCategory::Schema => "Unexpected response",
            UiErrorCategory::Server => "Server error",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self.category {
            UiErrorCategory::Config => Some(
                "Set EREPORT_API_BASE_URL (or api_base_url in ereport.toml) to the e-Report API address and relaunch.",
            ),
            UiErrorCategory::Transport => Some("Check that the API server is reachable."),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
