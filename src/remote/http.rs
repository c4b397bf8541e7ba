//! Reqwest-backed directory adapter.
//!
//! Owns transport details only: URL building, the request timeout, HTTP status
//! mapping and JSON decoding. Every failure leaves as a [`RemoteFailure`].

use super::DirectoryClient;
use crate::config::RemoteConfig;
use crate::error::{ApiError, RemoteFailure};
use crate::types::{UserDraft, UserId, UserRecord};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Directory client talking JSON over HTTP to `<base_url>/<collection>`.
pub struct HttpDirectoryClient {
    client: Client,
    collection: Url,
    timeout: Duration,
}

impl HttpDirectoryClient {
    /// Build a client for `collection` under `base_url` with a request timeout.
    pub fn new(base_url: &str, collection: &str, timeout: Duration) -> Result<Self, ApiError> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            collection.trim_matches('/')
        );
        let collection = Url::parse(&raw)
            .map_err(|e| ApiError::ConfigError(format!("Invalid directory URL {}: {}", raw, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            collection,
            timeout,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            &config.collection,
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// Collection endpoint
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn member_url(&self, id: UserId) -> Result<Url, RemoteFailure> {
        let raw = format!("{}/{}", self.collection.as_str().trim_end_matches('/'), id);
        Url::parse(&raw).map_err(|e| RemoteFailure::new(format!("Invalid URL {}: {}", raw, e)))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RemoteFailure {
        if err.is_timeout() {
            RemoteFailure::new(format!(
                "timeout of {}ms exceeded",
                self.timeout.as_millis()
            ))
        } else {
            RemoteFailure::new(err.to_string())
        }
    }

    /// Turn a non-success response into a failure, preferring the body text.
    /// A body that cannot be read is reported as the transport failure it is.
    async fn check_status(&self, response: Response) -> Result<Response, RemoteFailure> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        Err(status_failure(status, &body))
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, RemoteFailure> {
        let response = self.check_status(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| RemoteFailure::new(format!("Invalid directory JSON payload: {}", e)))
    }
}

fn status_failure(status: StatusCode, body: &str) -> RemoteFailure {
    let body = body.trim();
    if body.is_empty() || body == "{}" {
        RemoteFailure::new(format!(
            "Request failed with status code {}",
            status.as_u16()
        ))
    } else {
        RemoteFailure::new(body)
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn list(&self) -> Result<Vec<UserRecord>, RemoteFailure> {
        debug!(url = %self.collection, "GET directory collection");
        let response = self
            .client
            .get(self.collection.clone())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.decode(response).await
    }

    async fn create(&self, draft: &UserDraft) -> Result<UserRecord, RemoteFailure> {
        debug!(url = %self.collection, "POST directory record");
        let response = self
            .client
            .post(self.collection.clone())
            .json(draft)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.decode(response).await
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<UserRecord, RemoteFailure> {
        let url = self.member_url(id)?;
        debug!(url = %url, "PUT directory record");
        let response = self
            .client
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.decode(response).await
    }

    async fn delete(&self, id: UserId) -> Result<(), RemoteFailure> {
        let url = self.member_url(id)?;
        debug!(url = %url, "DELETE directory record");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.check_status(response).await?;
        Ok(())
    }
}
