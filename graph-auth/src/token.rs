//! Access token value type.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Cache lifetime for acquired tokens, in seconds.
///
/// 45 minutes, intentionally shorter than the identity platform's typical
/// 3600-second token expiry, so a token served from cache always has a
/// safety margin left when it reaches Graph.
pub const TOKEN_TTL_SECONDS: i64 = 2700;

/// An application-only bearer token.
///
/// Immutable once created; the cache replaces the whole value on refresh
/// and never mutates it in place.
///
/// # Security
///
/// The token value is never logged. The `Debug` implementation redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    acquired_at: DateTime<Utc>,
    ttl_seconds: i64,
}

impl AccessToken {
    /// Create a token acquired at the given instant.
    pub fn new(value: String, acquired_at: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            value,
            acquired_at,
            ttl_seconds,
        }
    }

    /// The bearer token value, as used in `Authorization` headers.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When the token was acquired (UTC).
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Cache lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// The instant at which the cache stops serving this token.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.acquired_at + Duration::seconds(self.ttl_seconds)
    }

    /// Whether the token is stale at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("acquired_at", &self.acquired_at)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let acquired = Utc::now();
        let token = AccessToken::new("tok".to_string(), acquired, TOKEN_TTL_SECONDS);

        let just_before = acquired + Duration::seconds(TOKEN_TTL_SECONDS - 1);
        let exactly = acquired + Duration::seconds(TOKEN_TTL_SECONDS);
        let after = acquired + Duration::seconds(TOKEN_TTL_SECONDS + 1);

        assert!(!token.is_expired_at(just_before));
        assert!(token.is_expired_at(exactly));
        assert!(token.is_expired_at(after));
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = AccessToken::new("top-secret-bearer".to_string(), Utc::now(), 60);
        let rendered = format!("{:?}", token);

        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("top-secret-bearer"));
    }
}
