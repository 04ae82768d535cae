//! # Client Configuration
//!
//! Configuration for the Graph client crates, built once at startup.
//!
//! The builder enforces fail-fast validation: every required field must be
//! present and non-empty before a `GraphConfig` can exist, so components
//! never have to re-check configuration at call time.
//!
//! ## Usage
//!
//! ```
//! use graph_core::config::GraphConfig;
//!
//! let config = GraphConfig::builder()
//!     .tenant_id("contoso.onmicrosoft.com")
//!     .client_id("11111111-2222-3333-4444-555555555555")
//!     .client_secret("secret-value")
//!     .from_address("noreply@contoso.com")
//!     .build()
//!     .expect("valid configuration");
//!
//! assert!(config.token_endpoint().starts_with("https://login.microsoftonline.com/"));
//! ```

use std::fmt;
use thiserror::Error;
use url::Url;

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Configuration errors raised at construction time.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration field: {name}")]
    MissingField { name: &'static str },

    #[error("invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Application-only credentials and endpoints for the Graph client.
///
/// Read-only once built; supplied to every component at construction.
/// The authority and Graph base URL are overridable for tests and
/// sovereign-cloud deployments.
#[derive(Clone)]
pub struct GraphConfig {
    /// Directory (tenant) the application belongs to
    pub tenant_id: String,

    /// Application (client) id
    pub client_id: String,

    /// Client secret for the credential exchange
    pub client_secret: String,

    /// Default sending address for outgoing mail
    pub from_address: String,

    /// Identity platform base URL
    pub authority: String,

    /// Graph API base URL, including the API version segment
    pub graph_base_url: String,
}

impl GraphConfig {
    /// Start building a configuration.
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }

    /// Full token endpoint URL for the client-credentials exchange.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/token?api-version=1.0",
            self.authority, self.tenant_id
        )
    }
}

// The secret must never appear in logs or panic messages.
impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("from_address", &self.from_address)
            .field("authority", &self.authority)
            .field("graph_base_url", &self.graph_base_url)
            .finish()
    }
}

/// Builder for [`GraphConfig`].
#[derive(Default)]
pub struct GraphConfigBuilder {
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    from_address: Option<String>,
    authority: Option<String>,
    graph_base_url: Option<String>,
}

impl GraphConfigBuilder {
    pub fn tenant_id(mut self, value: impl Into<String>) -> Self {
        self.tenant_id = Some(value.into());
        self
    }

    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secret = Some(value.into());
        self
    }

    pub fn from_address(mut self, value: impl Into<String>) -> Self {
        self.from_address = Some(value.into());
        self
    }

    /// Override the identity platform base URL.
    pub fn authority(mut self, value: impl Into<String>) -> Self {
        self.authority = Some(value.into());
        self
    }

    /// Override the Graph API base URL.
    pub fn graph_base_url(mut self, value: impl Into<String>) -> Self {
        self.graph_base_url = Some(value.into());
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required field is missing or empty, or
    /// when an endpoint override is not a valid URL.
    pub fn build(self) -> Result<GraphConfig, ConfigError> {
        let tenant_id = required(self.tenant_id, "tenant_id")?;
        let client_id = required(self.client_id, "client_id")?;
        let client_secret = required(self.client_secret, "client_secret")?;
        let from_address = required(self.from_address, "from_address")?;

        let authority = trim_trailing_slash(
            self.authority
                .unwrap_or_else(|| DEFAULT_AUTHORITY.to_string()),
        );
        let graph_base_url = trim_trailing_slash(
            self.graph_base_url
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
        );

        validate_url(&authority, "authority")?;
        validate_url(&graph_base_url, "graph_base_url")?;

        Ok(GraphConfig {
            tenant_id,
            client_id,
            client_secret,
            from_address,
            authority,
            graph_base_url,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField { name }),
    }
}

fn trim_trailing_slash(mut value: String) -> String {
    while value.ends_with('/') {
        value.pop();
    }
    value
}

fn validate_url(value: &str, name: &'static str) -> Result<(), ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> GraphConfigBuilder {
        GraphConfig::builder()
            .tenant_id("tenant")
            .client_id("client")
            .client_secret("hunter2")
            .from_address("noreply@example.com")
    }

    #[test]
    fn test_build_with_defaults() {
        let config = complete_builder().build().unwrap();

        assert_eq!(config.authority, "https://login.microsoftonline.com");
        assert_eq!(config.graph_base_url, "https://graph.microsoft.com/v1.0");
        assert_eq!(
            config.token_endpoint(),
            "https://login.microsoftonline.com/tenant/oauth2/token?api-version=1.0"
        );
    }

    #[test]
    fn test_missing_required_field() {
        let result = GraphConfig::builder()
            .tenant_id("tenant")
            .client_id("client")
            .from_address("noreply@example.com")
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingField {
                name: "client_secret"
            })
        ));
    }

    #[test]
    fn test_empty_field_rejected() {
        let result = complete_builder().tenant_id("  ").build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingField { name: "tenant_id" })
        ));
    }

    #[test]
    fn test_endpoint_overrides_are_normalized() {
        let config = complete_builder()
            .authority("https://login.example.test/")
            .graph_base_url("https://graph.example.test/v1.0/")
            .build()
            .unwrap();

        assert_eq!(config.authority, "https://login.example.test");
        assert_eq!(config.graph_base_url, "https://graph.example.test/v1.0");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = complete_builder().authority("not a url").build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidUrl {
                name: "authority",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = complete_builder().build().unwrap();
        let rendered = format!("{:?}", config);

        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }
}
