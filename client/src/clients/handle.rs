use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use super::types::{Provisioned, StatusResponse};
use crate::constants::endpoints;
use crate::errors::{PreconditionError, Result};
use crate::http::Transport;

/// Client-side record of one remote ManagerITM instance.
///
/// A handle starts out unprovisioned; a proxy or command client fills in the
/// `client_id` the server assigns. `start`, `status` and `stop` are keyed by
/// that identifier. `close` tears the remote instance down, and dropping a
/// handle that still holds an identifier makes a best-effort attempt to do
/// the same.
#[derive(Debug)]
pub struct ClientHandle {
    transport: Transport,
    client_id: Option<String>,
}

impl ClientHandle {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::from_transport(Transport::new(base_uri))
    }

    pub fn with_http_client(base_uri: impl Into<String>, client: Client) -> Self {
        Self::from_transport(Transport::with_client(base_uri, client))
    }

    pub fn from_transport(transport: Transport) -> Self {
        Self {
            transport,
            client_id: None,
        }
    }

    /// Take over an instance provisioned elsewhere.
    pub fn attach(transport: Transport, client_id: impl Into<String>) -> Self {
        Self {
            transport,
            client_id: Some(client_id.into()),
        }
    }

    pub fn base_uri(&self) -> &str {
        self.transport.base_uri()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn is_provisioned(&self) -> bool {
        self.client_id.is_some()
    }

    /// Create a remote instance and remember its identifier.
    ///
    /// Re-provisioning overwrites the stored identifier; the earlier remote
    /// instance is left alone.
    pub(crate) async fn provision<B, R>(
        &mut self,
        path: &str,
        body: &B,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Provisioned,
    {
        let response: R = self.transport.request(Method::POST, path, Some(body)).await?;
        let client_id = response.client_id().to_string();

        if let Some(previous) = self.client_id.replace(client_id.clone()) {
            warn!(
                "Re-provisioned handle on {}: {} replaced by {}",
                self.base_uri(),
                previous,
                client_id
            );
        } else {
            info!("Provisioned client {} via {}", client_id, path);
        }

        Ok(response)
    }

    /// The stored identifier together with its encoded path segment.
    fn require_client_id(&self, operation: &'static str) -> Result<(&str, String)> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(PreconditionError::NotProvisioned { operation })?;
        let segment = endpoints::segment(client_id).ok_or_else(|| {
            PreconditionError::InvalidClientId {
                client_id: client_id.to_string(),
            }
        })?;
        Ok((client_id, segment))
    }

    /// Launch the remote process. The returned status may already be set if
    /// the process exited immediately.
    pub async fn start(&self) -> Result<StatusResponse> {
        let (client_id, segment) = self.require_client_id("start")?;
        let status: StatusResponse = self
            .transport
            .request::<_, ()>(Method::POST, &endpoints::start(&segment), None)
            .await?;
        info!("Started client {}: status {:?}", client_id, status.status);
        Ok(status)
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        let (_, segment) = self.require_client_id("query status of")?;
        self.transport
            .request::<_, ()>(Method::GET, &endpoints::status(&segment), None)
            .await
    }

    pub async fn stop(&self) -> Result<StatusResponse> {
        let (client_id, segment) = self.require_client_id("stop")?;
        let status: StatusResponse = self
            .transport
            .request::<_, ()>(Method::POST, &endpoints::stop(&segment), None)
            .await?;
        info!("Stopped client {}: status {:?}", client_id, status.status);
        Ok(status)
    }

    /// Poll `status()` until the process reports an exit status or `max_wait`
    /// elapses. Returns the last status seen and how many polls were made.
    ///
    /// A `max_wait` too large to represent as an instant means no deadline.
    pub async fn wait_for_exit(
        &self,
        interval: Duration,
        max_wait: Duration,
    ) -> Result<(StatusResponse, u32)> {
        let deadline = Instant::now().checked_add(max_wait);
        let mut polls = 0;

        loop {
            let status = self.status().await?;
            polls += 1;

            if !status.is_running() {
                return Ok((status, polls));
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!("Gave up waiting for exit after {} polls", polls);
                        return Ok((status, polls));
                    }
                    interval.min(deadline - now)
                }
                None => interval,
            };

            sleep(pause).await;
        }
    }

    /// Forget the remote instance without tearing it down.
    pub fn detach(mut self) -> Option<String> {
        self.client_id.take()
    }

    /// Tear down the remote instance.
    ///
    /// Failures are logged and swallowed. The identifier is cleared either
    /// way, so calling this twice sends a single request.
    pub async fn close(&mut self) {
        let Some(client_id) = self.client_id.take() else {
            return;
        };
        teardown(&self.transport, &client_id).await;
    }
}

async fn teardown(transport: &Transport, client_id: &str) {
    let Some(segment) = endpoints::segment(client_id) else {
        warn!("Skipping teardown of unaddressable client '{}'", client_id);
        return;
    };

    match transport
        .execute(Method::DELETE, &endpoints::instance(&segment))
        .await
    {
        Ok(()) => info!("Tore down client {}", client_id),
        Err(e) => warn!("Teardown of client {} failed, ignoring: {}", client_id, e),
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        let Some(client_id) = self.client_id.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let transport = self.transport.clone();
                runtime.spawn(async move {
                    teardown(&transport, &client_id).await;
                });
            }
            Err(_) => warn!(
                "Client {} dropped outside an async runtime; remote instance left running",
                client_id
            ),
        }
    }
}
