//! Shared error taxonomy for Graph API calls.
//!
//! Every remote failure in this workspace classifies into exactly one
//! `GraphError` variant. Components never downgrade or re-wrap a variant;
//! errors bubble to the caller unchanged.

use thiserror::Error;

use crate::http::HttpError;

/// Classified failure modes for identity and Graph API calls.
///
/// The enum is `Clone` so that a single in-flight token fetch can deliver
/// the same failure to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The identity platform rejected the credential exchange
    /// (bad secret, disabled app, unknown tenant, ...).
    #[error("Microsoft identity platform responded with code {code}: {message}")]
    TokenUnavailable { code: String, message: String },

    /// Graph rejected the request (bad recipient, throttling, permission).
    /// The provider code and message are preserved verbatim for diagnostics.
    #[error("Microsoft Graph responded with code {code}: {message}")]
    ServiceRejected { code: String, message: String },

    /// DNS, timeout, or connection failure on either endpoint. Safe to
    /// retry at a higher layer.
    #[error("the service could not be reached")]
    NetworkUnreachable,

    /// Anything that matches no other family. Treated as fatal.
    #[error("an unknown error occurred")]
    Unknown,
}

/// Result type shared by the Graph client crates.
pub type Result<T> = std::result::Result<T, GraphError>;

impl From<HttpError> for GraphError {
    /// Classify a transport-level failure.
    ///
    /// Connection problems are indistinguishable from transient outages and
    /// map to `NetworkUnreachable`; everything else is `Unknown`.
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Timeout | HttpError::Connect(_) => GraphError::NetworkUnreachable,
            HttpError::Request(_) => GraphError::Unknown,
        }
    }
}
