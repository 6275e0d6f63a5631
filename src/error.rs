//! Error taxonomy for catalog requests.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by the Shopify fetch client.
///
/// Only [`ShopError::RateLimited`] is recovered locally (see
/// [`crate::shopify::retry`]); everything else propagates to the caller.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Credentials are missing or were rejected (HTTP 401/403).
    #[error(
        "Authentication failed: {reason}. Check SHOPIFY_SHOP_NAME and SHOPIFY_ACCESS_TOKEN, \
         and that the app has the read_products scope"
    )]
    Authentication { reason: String },

    /// Connectivity failure, timeout or a broken response stream.
    #[error("Network error: {0}. Check your connection and try again")]
    Network(#[from] wreq::Error),

    /// HTTP 429. Carries the server's `Retry-After` hint when present.
    #[error("Rate limited by Shopify (HTTP 429); retry budget exhausted")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other non-2xx response.
    #[error("Shopify returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// A 2xx response whose body was not the expected JSON.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server handed back a cursor that was already requested.
    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ShopError {
    /// Maps a non-success HTTP status to the matching error variant.
    pub fn from_status(status: u16, retry_after: Option<Duration>, body: &str) -> Self {
        match status {
            401 | 403 => ShopError::Authentication {
                reason: format!("HTTP {} ({})", status, excerpt(body)),
            },
            429 => ShopError::RateLimited { retry_after },
            _ => ShopError::Service { status, body: excerpt(body) },
        }
    }

    /// Returns true for errors the bounded retry wrapper may recover from.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ShopError::RateLimited { .. })
    }

    /// Returns true when the error stems from missing or rejected credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, ShopError::Authentication { .. })
    }
}

const BODY_EXCERPT_CHARS: usize = 200;

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > BODY_EXCERPT_CHARS {
        let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}
