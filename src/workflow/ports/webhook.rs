//! Outbound webhook port.

use crate::{error::ErrorKind, workflow::domain::HttpMethod};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Outbound webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    /// Target URL.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// JSON payload; not sent for `GET`.
    pub body: Value,
}

/// Response status of a webhook call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookResponse {
    /// HTTP status code.
    pub status: u16,
}

impl WebhookResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP transport contract for webhooks. One attempt, no retry.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Issues the call and returns its status.
    async fn send(&self, request: &WebhookRequest) -> WebhookResult<WebhookResponse>;
}

/// Errors returned by webhook adapters.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// The URL could not be parsed.
    #[error("invalid webhook URL '{0}'")]
    InvalidUrl(String),

    /// The request failed before a response arrived.
    #[error("webhook transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl WebhookError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Unavailable,
        }
    }
}
