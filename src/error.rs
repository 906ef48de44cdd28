//! Error types for the RT REST client.
//!
//! This module defines `RtError`, the single error type returned by every
//! operation, and `ErrorKind`, the coarse classification callers can match
//! on without caring which underlying library produced the failure.
//!
//! # Security
//!
//! Credentials never appear in error messages. The only free-form text
//! carried by an error is the raw body of a non-2xx response, which is
//! what the server chose to send back.

use std::time::Duration;
use thiserror::Error;

/// Coarse classification of an [`RtError`].
///
/// Every variant of `RtError` maps onto exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client was constructed with an unusable configuration.
    Configuration,
    /// The outgoing request could not be assembled (URL, body or headers).
    RequestBuild,
    /// The request never produced a response (network failure or timeout).
    Transport,
    /// The response arrived but its body could not be read.
    ResponseRead,
    /// The server answered with a status outside `200..300`.
    ApiStatus,
    /// The response body did not match the expected shape.
    Decode,
    /// A follow-up lookup needed to complete a result failed.
    Enrichment,
}

/// Unified error type for all RT client operations.
#[derive(Error, Debug)]
pub enum RtError {
    /// Configuration error - missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The endpoint joined onto the base URL is not a valid URL.
    #[error("error parsing URL: {0}")]
    InvalidUrl(#[source] url::ParseError),

    /// The request body could not be serialized to JSON.
    #[error("error marshaling request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// reqwest refused to build the request (bad header value, etc.).
    #[error("error creating request: {0}")]
    RequestBuild(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request failed in transit.
    #[error("error making request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {duration:?}: {operation}")]
    Timeout {
        /// The configured timeout that expired.
        duration: Duration,
        /// Method and URL of the request that timed out.
        operation: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read off the connection.
    #[error("error reading response body: {0}")]
    ResponseRead(#[source] reqwest::Error),

    /// The server returned a status outside `200..300`.
    #[error("unexpected status code: {status}, body: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, verbatim.
        body: String,
    },

    /// The response body could not be decoded into the expected type.
    #[error("error parsing {target}: {source}")]
    Decode {
        /// What was being decoded (e.g. "ticket", "user").
        target: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A requestor detail lookup failed while completing a ticket.
    #[error("error getting requestor details for user {user_id}: {source}")]
    Enrichment {
        /// Identifier of the user whose lookup failed.
        user_id: String,
        /// Why the lookup failed.
        #[source]
        source: Box<RtError>,
    },
}

impl RtError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        RtError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        RtError::Config(message.into())
    }

    /// Creates a decode error for the named target.
    pub fn decode(target: &'static str, source: serde_json::Error) -> Self {
        RtError::Decode { target, source }
    }

    /// Wraps a failed requestor lookup.
    pub fn enrichment(user_id: impl Into<String>, source: RtError) -> Self {
        RtError::Enrichment {
            user_id: user_id.into(),
            source: Box::new(source),
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RtError::Config(_) | RtError::HttpClient(_) => ErrorKind::Configuration,
            RtError::InvalidUrl(_) | RtError::Encode(_) | RtError::RequestBuild(_) => {
                ErrorKind::RequestBuild
            }
            RtError::Transport(_) | RtError::Timeout { .. } => ErrorKind::Transport,
            RtError::ResponseRead(_) => ErrorKind::ResponseRead,
            RtError::HttpStatus { .. } => ErrorKind::ApiStatus,
            RtError::Decode { .. } => ErrorKind::Decode,
            RtError::Enrichment { .. } => ErrorKind::Enrichment,
        }
    }

    /// Returns the HTTP status for `HttpStatus` errors.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            RtError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, RtError::Timeout { .. })
    }
}
