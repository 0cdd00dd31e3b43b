use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::{RemoteRequestError, Result};

/// Thin wrapper around `reqwest::Client` bound to one ManagerITM base URI.
///
/// Every call is a single request: no retries, and no timeout beyond what the
/// wrapped client was built with.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_uri: String,
}

impl Transport {
    pub fn new(base_uri: impl Into<String>) -> Self {
        // No timeout - the remote process decides how long calls take
        Self::with_client(base_uri, Client::new())
    }

    pub fn with_client(base_uri: impl Into<String>, client: Client) -> Self {
        let base_uri = base_uri.into();
        let base_uri = base_uri.strip_suffix('/').unwrap_or(&base_uri).to_string();
        Self { client, base_uri }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_uri, path)
    }

    /// Send a request and decode the JSON response body.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.send(method, &url, body).await?;

        let decoded = response
            .json::<T>()
            .await
            .map_err(|e| RemoteRequestError::InvalidResponse {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        Ok(decoded)
    }

    /// Send a request whose response body is not needed.
    pub async fn execute(&self, method: Method, path: &str) -> Result<()> {
        let url = self.url(path);
        self.send::<()>(method, &url, None).await?;
        Ok(())
    }

    async fn send<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RemoteRequestError::ConnectionFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("{} {} failed with {}: {}", method, url, status, body);
            return Err(RemoteRequestError::Status {
                method,
                url: url.to_string(),
                status,
                body,
            }
            .into());
        }

        Ok(response)
    }
}
