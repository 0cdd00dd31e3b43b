use super::handle::ClientHandle;
use super::types::{CommandRequest, CommandResponse, StatusResponse};
use crate::constants::endpoints;
use crate::errors::Result;
use crate::http::Transport;

/// Provisions and drives a remote command-execution instance.
#[derive(Debug)]
pub struct CommandClient {
    handle: ClientHandle,
}

impl CommandClient {
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

    /// Create the remote command instance with an optional replacement
    /// environment and/or an overlay on the remote default.
    pub async fn client(&mut self, request: &CommandRequest) -> Result<CommandResponse> {
        self.handle
            .provision(endpoints::COMMAND_CLIENT, request)
            .await
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
