//! Authenticated drive client.
//!
//! Items are addressed by path relative to the drive root using the
//! `/drives/{drive-id}/root:/{path}` form. The empty path addresses the
//! root itself.

use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use graph_auth::TokenCache;
use graph_core::config::GraphConfig;
use graph_core::error::{GraphError, Result};
use graph_core::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};

use crate::types::{DriveChildrenResponse, DriveItem};

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

/// Path-addressed client for one Graph drive.
///
/// Shares the token cache and error taxonomy with the mail transport; every
/// remote failure comes back as a [`GraphError`]. No retries and no
/// pagination; large transfers go through memory as a single [`Bytes`].
pub struct DriveClient {
    config: Arc<GraphConfig>,
    tokens: Arc<TokenCache>,
    http: Arc<dyn HttpClient>,
    drive_id: String,
}

impl DriveClient {
    pub fn new(
        config: Arc<GraphConfig>,
        tokens: Arc<TokenCache>,
        http: Arc<dyn HttpClient>,
        drive_id: impl Into<String>,
    ) -> Self {
        Self {
            config,
            tokens,
            http,
            drive_id: drive_id.into(),
        }
    }

    /// Encode a slash-separated path segment by segment.
    fn encode_path(path: &str) -> String {
        path.trim_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn root_url(&self) -> String {
        format!(
            "{}/drives/{}/root",
            self.config.graph_base_url, self.drive_id
        )
    }

    /// URL addressing an item, with an optional suffix such as `children`
    /// or `content`.
    fn item_url(&self, path: &str, suffix: Option<&str>) -> String {
        let path = path.trim_matches('/');
        match (path.is_empty(), suffix) {
            (true, None) => self.root_url(),
            (true, Some(suffix)) => format!("{}/{}", self.root_url(), suffix),
            (false, None) => format!("{}:/{}", self.root_url(), Self::encode_path(path)),
            (false, Some(suffix)) => format!(
                "{}:/{}:/{}",
                self.root_url(),
                Self::encode_path(path),
                suffix
            ),
        }
    }

    async fn authorized(&self, method: HttpMethod, url: String) -> Result<HttpRequest> {
        let token = self.tokens.get_token().await?;
        Ok(HttpRequest::new(method, url)
            .bearer_token(token.value())
            .header("Accept", "application/json"))
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.http.execute(request).await.map_err(|e| {
            warn!(error = %e, "Drive endpoint could not be reached");
            GraphError::from(e)
        })
    }

    /// Classify a non-2xx response into the shared error taxonomy.
    fn rejection(response: &HttpResponse) -> GraphError {
        match response.json::<GraphErrorEnvelope>() {
            Ok(envelope) => {
                warn!(
                    status = response.status,
                    code = %envelope.error.code,
                    "Service rejected the drive request"
                );
                GraphError::ServiceRejected {
                    code: envelope.error.code,
                    message: envelope.error.message,
                }
            }
            Err(e) => {
                warn!(
                    status = response.status,
                    error = %e,
                    "Drive endpoint returned an unreadable error body"
                );
                GraphError::Unknown
            }
        }
    }

    fn parse_item(response: &HttpResponse) -> Result<DriveItem> {
        response.json::<DriveItem>().map_err(|e| {
            warn!(error = %e, "Drive endpoint returned an unreadable item body");
            GraphError::Unknown
        })
    }

    /// Fetch item metadata by path.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get_item(&self, path: &str) -> Result<DriveItem> {
        let request = self
            .authorized(HttpMethod::Get, self.item_url(path, None))
            .await?;
        let response = self.execute(request).await?;

        if response.is_success() {
            Self::parse_item(&response)
        } else {
            Err(Self::rejection(&response))
        }
    }

    /// List the children of a folder. The first page only.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn list_children(&self, path: &str) -> Result<Vec<DriveItem>> {
        let request = self
            .authorized(HttpMethod::Get, self.item_url(path, Some("children")))
            .await?;
        let response = self.execute(request).await?;

        if !response.is_success() {
            return Err(Self::rejection(&response));
        }

        let listing: DriveChildrenResponse = response.json().map_err(|e| {
            warn!(error = %e, "Drive endpoint returned an unreadable listing body");
            GraphError::Unknown
        })?;

        debug!(children = listing.value.len(), "Listed folder");
        Ok(listing.value)
    }

    /// Download a file's content.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn download(&self, path: &str) -> Result<Bytes> {
        let request = self
            .authorized(HttpMethod::Get, self.item_url(path, Some("content")))
            .await?;
        let response = self.execute(request).await?;

        if response.is_success() {
            info!(bytes = response.body.len(), "Downloaded file");
            Ok(response.body)
        } else {
            Err(Self::rejection(&response))
        }
    }

    /// Upload (create or replace) a file's content.
    #[instrument(skip(self, content), fields(path = %path, bytes = content.len()))]
    pub async fn upload(&self, path: &str, content: Bytes) -> Result<DriveItem> {
        let request = self
            .authorized(HttpMethod::Put, self.item_url(path, Some("content")))
            .await?
            .header("Content-Type", "application/octet-stream")
            .body(content);
        let response = self.execute(request).await?;

        if response.is_success() {
            info!("Uploaded file");
            Self::parse_item(&response)
        } else {
            Err(Self::rejection(&response))
        }
    }

    /// Delete an item.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self
            .authorized(HttpMethod::Delete, self.item_url(path, None))
            .await?;
        let response = self.execute(request).await?;

        if response.is_success() {
            info!("Deleted item");
            Ok(())
        } else {
            Err(Self::rejection(&response))
        }
    }
}
