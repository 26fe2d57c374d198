//! Core types and transforms for AMeDAS airport wind observations
//!
//! This crate holds the provider-agnostic half of the pipeline: the
//! snapshot data model, the timestamp key codec, station extraction,
//! wind presentation and the orchestrator that drives a fetch chain.
//! Network access lives behind the traits in [`pipeline`].

pub mod airports;
pub mod codec;
pub mod extract;
pub mod pipeline;
pub mod session;
pub mod types;
pub mod wind;

pub use airports::*;
pub use codec::*;
pub use extract::*;
pub use pipeline::*;
pub use session::*;
pub use types::*;
pub use wind::*;

use thiserror::Error;

/// Longest slice of an unparseable body kept for diagnostics
pub const RAW_PREFIX_LIMIT: usize = 200;

/// Failure while fetching one provider snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Request to AMeDAS provider failed: {0}")]
    Request(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("Empty response from AMeDAS provider")]
    EmptyBody,

    /// Body is not JSON, or is JSON whose top level is not an object
    /// (`[]`, `null`, `42`, a bare string). Station entries themselves are
    /// not checked.
    #[error("Invalid JSON response from AMeDAS provider: {reason}")]
    MalformedPayload { raw_prefix: String, reason: String },
}

impl FetchError {
    /// Build a `MalformedPayload` keeping at most [`RAW_PREFIX_LIMIT`] characters of `raw`
    pub fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        FetchError::MalformedPayload {
            raw_prefix: raw.chars().take(RAW_PREFIX_LIMIT).collect(),
            reason: reason.into(),
        }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::Request(_) => "request",
            FetchError::HttpStatus { .. } => "http_status",
            FetchError::EmptyBody => "empty_body",
            FetchError::MalformedPayload { .. } => "malformed_payload",
        }
    }
}

/// Failure of the latest-timestamp collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Failed to fetch latest time: {0}")]
    Request(String),

    #[error("Failed to fetch latest time: status {status}")]
    HttpStatus { status: u16 },

    #[error("Latest time not available: {0}")]
    Unparseable(String),
}

pub type FetchResult<T> = Result<T, FetchError>;
pub type ResolveResult<T> = Result<T, ResolveError>;
