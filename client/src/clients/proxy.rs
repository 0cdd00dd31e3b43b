use tracing::info;

use super::handle::ClientHandle;
use super::types::{ProxyRequest, ProxyResponse, StatusResponse};
use crate::constants::endpoints;
use crate::errors::Result;
use crate::http::Transport;

/// Provisions and drives a remote proxy instance.
#[derive(Debug)]
pub struct ProxyClient {
    handle: ClientHandle,
}

impl ProxyClient {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            handle: ClientHandle::new(base_uri),
        }
    }

    pub fn from_transport(transport: Transport) -> Self {
        Self {
            handle: ClientHandle::from_transport(transport),
        }
    }

    /// Create the remote proxy. Only the fields set on `request` are sent.
    pub async fn client(&mut self, request: &ProxyRequest) -> Result<ProxyResponse> {
        let response: ProxyResponse = self
            .handle
            .provision(endpoints::PROXY_CLIENT, request)
            .await?;

        info!(
            "Proxy {} listening on port {:?}, web UI on {:?}",
            response.client_id,
            response.port(),
            response.webport()
        );
        Ok(response)
    }

    pub async fn start(&self) -> Result<StatusResponse> {
        self.handle.start().await
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        self.handle.status().await
    }

    pub async fn stop(&self) -> Result<StatusResponse> {
        self.handle.stop().await
    }

    pub async fn close(&mut self) {
        self.handle.close().await
    }

    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }

    pub fn into_handle(self) -> ClientHandle {
        self.handle
    }
}
