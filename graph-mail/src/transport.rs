//! Authenticated mail dispatcher.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use graph_auth::TokenCache;
use graph_core::config::GraphConfig;
use graph_core::error::{GraphError, Result};
use graph_core::http::{HttpClient, HttpMethod, HttpRequest};

use crate::message::Message;
use crate::payload::{build_payload, MailPayload};

/// Request body for the `/users/{id}/sendMail` endpoint. The API expects
/// the message wrapped under a top-level `message` key.
#[derive(Debug, Serialize)]
struct SendMailRequest {
    message: MailPayload,
}

/// Graph error envelope returned on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    code: String,
    message: String,
}

/// Sends messages through the Graph `sendMail` endpoint.
///
/// Token acquisition goes through the shared [`TokenCache`]; a token failure
/// surfaces from [`send`](MailTransport::send) unchanged. The transport
/// never retries; the caller decides what a failed send means.
pub struct MailTransport {
    config: Arc<GraphConfig>,
    tokens: Arc<TokenCache>,
    http: Arc<dyn HttpClient>,
}

impl MailTransport {
    pub fn new(config: Arc<GraphConfig>, tokens: Arc<TokenCache>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            tokens,
            http,
        }
    }

    fn send_url(&self, message: &Message) -> String {
        // The URL always carries a sending address even when the payload
        // has none; the configured default covers the from-less case.
        let from = message
            .from
            .as_ref()
            .map(|a| a.email.as_str())
            .unwrap_or(&self.config.from_address);

        format!(
            "{}/users/{}/sendMail",
            self.config.graph_base_url,
            urlencoding::encode(from)
        )
    }

    /// Send a message and return the number of envelope recipients.
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    pub async fn send(&self, message: &Message) -> Result<usize> {
        let token = self.tokens.get_token().await?;

        let request = HttpRequest::new(HttpMethod::Post, self.send_url(message))
            .bearer_token(token.value())
            .header("Accept", "application/json")
            .json(&SendMailRequest {
                message: build_payload(message),
            })
            .map_err(GraphError::from)?;

        debug!(
            recipients = message.recipient_count(),
            attachments = message.attachments.len(),
            "Submitting message"
        );

        let response = self.http.execute(request).await.map_err(|e| {
            warn!(error = %e, "Mail endpoint could not be reached");
            GraphError::from(e)
        })?;

        if response.is_success() {
            info!(
                recipients = message.recipient_count(),
                "Message accepted"
            );
            return Ok(message.recipient_count());
        }

        let status = response.status;
        match response.json::<GraphErrorEnvelope>() {
            Ok(envelope) => {
                warn!(
                    status = status,
                    code = %envelope.error.code,
                    "Service rejected the message"
                );
                Err(GraphError::ServiceRejected {
                    code: envelope.error.code,
                    message: envelope.error.message,
                })
            }
            Err(e) => {
                warn!(
                    status = status,
                    error = %e,
                    "Mail endpoint returned an unreadable error body"
                );
                Err(GraphError::Unknown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use graph_auth::{AccessToken, TokenSource, TOKEN_TTL_SECONDS};
    use graph_core::http::{HttpError, HttpResponse};
    use mockall::mock;
    use serde_json::Value;
    use std::collections::HashMap;

    use crate::message::Address;

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

    struct StaticTokenSource;

    #[async_trait]
    impl TokenSource for StaticTokenSource {
        async fn fetch(&self) -> Result<AccessToken> {
            Ok(AccessToken::new(
                "tok-abc".to_string(),
                Utc::now(),
                TOKEN_TTL_SECONDS,
            ))
        }
    }

    struct FailingTokenSource;

    #[async_trait]
    impl TokenSource for FailingTokenSource {
        async fn fetch(&self) -> Result<AccessToken> {
            Err(GraphError::NetworkUnreachable)
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

    fn transport(mock_http: MockHttpClient) -> MailTransport {
        MailTransport::new(
            test_config(),
            Arc::new(TokenCache::new(Arc::new(StaticTokenSource))),
            Arc::new(mock_http),
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
    async fn test_send_success_counts_recipients() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(
                req.url,
                "https://graph.microsoft.com/v1.0/users/sender%40example.com/sendMail"
            );
            assert_eq!(
                req.headers.get("Authorization"),
                Some(&"Bearer tok-abc".to_string())
            );
            assert_eq!(
                req.headers.get("Content-Type"),
                Some(&"application/json".to_string())
            );

            Ok(response(202, ""))
        });

        let message = Message::new("Hello")
            .from(Address::new("sender@example.com"))
            .to(Address::new("a@example.com"))
            .to(Address::new("b@example.com"))
            .cc(Address::new("c@example.com"));

        let sent = transport(mock_http).send(&message).await.unwrap();
        assert_eq!(sent, 3);
    }

    #[tokio::test]
    async fn test_body_is_wrapped_under_message_key() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            let body: Value = serde_json::from_slice(&req.body.unwrap()).unwrap();

            let wrapper = body.as_object().unwrap();
            assert_eq!(wrapper.len(), 1);
            assert_eq!(body["message"]["subject"], "Wrapped");

            Ok(response(202, ""))
        });

        let message = Message::new("Wrapped")
            .from(Address::new("sender@example.com"))
            .to(Address::new("a@example.com"));

        transport(mock_http).send(&message).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_from_falls_back_to_configured_address() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(
                req.url,
                "https://graph.microsoft.com/v1.0/users/noreply%40example.com/sendMail"
            );

            // The payload itself still omits the sender.
            let body: Value = serde_json::from_slice(&req.body.unwrap()).unwrap();
            let payload = body["message"].as_object().unwrap();
            assert!(!payload.contains_key("sender"));
            assert!(!payload.contains_key("from"));

            Ok(response(202, ""))
        });

        let message = Message::new("No from").to(Address::new("a@example.com"));
        transport(mock_http).send(&message).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_is_classified() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                403,
                r#"{"error":{"code":"ErrorAccessDenied","message":"Access is denied"}}"#,
            ))
        });

        let message = Message::new("Denied")
            .from(Address::new("sender@example.com"))
            .to(Address::new("a@example.com"));

        let error = transport(mock_http).send(&message).await.unwrap_err();
        assert_eq!(
            error,
            GraphError::ServiceRejected {
                code: "ErrorAccessDenied".to_string(),
                message: "Access is denied".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unreadable_error_body_is_unknown() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(500, "<html>Internal Server Error</html>")));

        let message = Message::new("Broken")
            .from(Address::new("sender@example.com"))
            .to(Address::new("a@example.com"));

        let error = transport(mock_http).send(&message).await.unwrap_err();
        assert_eq!(error, GraphError::Unknown);
    }

    #[tokio::test]
    async fn test_connect_failure_is_unreachable() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(HttpError::Connect("connection refused".to_string())));

        let message = Message::new("Offline")
            .from(Address::new("sender@example.com"))
            .to(Address::new("a@example.com"));

        let error = transport(mock_http).send(&message).await.unwrap_err();
        assert_eq!(error, GraphError::NetworkUnreachable);
    }

    #[tokio::test]
    async fn test_token_failure_propagates_unchanged() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(0);

        let transport = MailTransport::new(
            test_config(),
            Arc::new(TokenCache::new(Arc::new(FailingTokenSource))),
            Arc::new(mock_http),
        );

        let message = Message::new("No token").to(Address::new("a@example.com"));
        let error = transport.send(&message).await.unwrap_err();

        assert_eq!(error, GraphError::NetworkUnreachable);
    }
}
