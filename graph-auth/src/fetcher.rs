//! OAuth 2.0 client-credentials exchange.
//!
//! One form-encoded POST against the identity platform's token endpoint.
//! The fetcher never retries internally; a failed exchange is classified
//! and surfaced to the caller (normally the [`TokenCache`]) as-is.
//!
//! [`TokenCache`]: crate::cache::TokenCache

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use graph_core::config::GraphConfig;
use graph_core::error::{GraphError, Result};
use graph_core::http::{HttpClient, HttpMethod, HttpRequest};

use crate::token::{AccessToken, TOKEN_TTL_SECONDS};

/// Resource identifier sent with the credential exchange.
const GRAPH_RESOURCE: &str = "https://graph.microsoft.com/";

/// Source of fresh access tokens.
///
/// The seam between the cache and the network: production code uses
/// [`TokenFetcher`], tests substitute counting or failing stubs.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Acquire a fresh token. Never served from any cache.
    async fn fetch(&self) -> Result<AccessToken>;
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error body returned by the identity platform on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: String,
}

/// Client-credentials token fetcher for the Microsoft identity platform.
pub struct TokenFetcher {
    config: Arc<GraphConfig>,
    http: Arc<dyn HttpClient>,
}

impl TokenFetcher {
    pub fn new(config: Arc<GraphConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    fn build_form_body(&self) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("resource", GRAPH_RESOURCE),
            ("grant_type", "client_credentials"),
        ];

        // Infallible for string pairs.
        serde_urlencoded::to_string(params).unwrap_or_default()
    }
}

#[async_trait]
impl TokenSource for TokenFetcher {
    #[instrument(skip(self), fields(tenant_id = %self.config.tenant_id))]
    async fn fetch(&self) -> Result<AccessToken> {
        debug!("Requesting access token from identity platform");

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_endpoint())
            .header("Accept", "application/json")
            .form(self.build_form_body());

        let response = self.http.execute(request).await.map_err(|e| {
            warn!(error = %e, "Token endpoint could not be reached");
            GraphError::from(e)
        })?;

        if response.is_success() {
            let parsed: TokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
                warn!(error = %e, "Token endpoint returned an unreadable success body");
                GraphError::Unknown
            })?;

            debug!("Access token acquired");

            return Ok(AccessToken::new(
                parsed.access_token,
                Utc::now(),
                TOKEN_TTL_SECONDS,
            ));
        }

        let status = response.status;
        match serde_json::from_slice::<TokenErrorResponse>(&response.body) {
            Ok(body) => {
                warn!(
                    status = status,
                    code = %body.error,
                    "Identity platform rejected the credential exchange"
                );
                Err(GraphError::TokenUnavailable {
                    code: body.error,
                    message: body.error_description,
                })
            }
            Err(e) => {
                warn!(
                    status = status,
                    error = %e,
                    "Token endpoint returned an unreadable error body"
                );
                Err(GraphError::Unknown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use graph_core::http::{HttpError, HttpResponse};
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(
                &self,
                request: HttpRequest,
            ) -> std::result::Result<HttpResponse, HttpError>;
        }
    }

    fn test_config() -> Arc<GraphConfig> {
        Arc::new(
            GraphConfig::builder()
                .tenant_id("tenant")
                .client_id("app-id")
                .client_secret("app-secret")
                .from_address("noreply@example.com")
                .build()
                .unwrap(),
        )
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(
                req.url,
                "https://login.microsoftonline.com/tenant/oauth2/token?api-version=1.0"
            );
            assert_eq!(
                req.headers.get("Content-Type"),
                Some(&"application/x-www-form-urlencoded".to_string())
            );

            let body = String::from_utf8(req.body.unwrap().to_vec()).unwrap();
            assert!(body.contains("client_id=app-id"));
            assert!(body.contains("client_secret=app-secret"));
            assert!(body.contains("grant_type=client_credentials"));
            assert!(body.contains("resource=https%3A%2F%2Fgraph.microsoft.com%2F"));

            Ok(response(200, r#"{"access_token":"tok-123","expires_in":3600}"#))
        });

        let fetcher = TokenFetcher::new(test_config(), Arc::new(mock_http));
        let token = fetcher.fetch().await.unwrap();

        assert_eq!(token.value(), "tok-123");
        assert_eq!(token.ttl_seconds(), TOKEN_TTL_SECONDS);
    }

    #[tokio::test]
    async fn test_fetch_rejected_credentials() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                401,
                r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#,
            ))
        });

        let fetcher = TokenFetcher::new(test_config(), Arc::new(mock_http));
        let error = fetcher.fetch().await.unwrap_err();

        assert_eq!(
            error,
            GraphError::TokenUnavailable {
                code: "invalid_client".to_string(),
                message: "AADSTS7000215: Invalid client secret provided.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_unreachable() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(HttpError::Timeout));

        let fetcher = TokenFetcher::new(test_config(), Arc::new(mock_http));
        let error = fetcher.fetch().await.unwrap_err();

        assert_eq!(error, GraphError::NetworkUnreachable);
    }

    #[tokio::test]
    async fn test_fetch_unreadable_error_body_is_unknown() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(502, "<html>Bad Gateway</html>")));

        let fetcher = TokenFetcher::new(test_config(), Arc::new(mock_http));
        let error = fetcher.fetch().await.unwrap_err();

        assert_eq!(error, GraphError::Unknown);
    }
}
