//! Drive one remote instance from start to teardown.

use serde::Serialize;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::clients::{ClientHandle, StatusResponse};
use crate::errors::Result;

/// Outcome of [`run_session`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub client_id: String,
    pub start: StatusResponse,
    pub last_status: StatusResponse,
    pub polls: u32,
    /// Whether the process was still running at `max_wait` and had to be stopped
    pub stopped: bool,
}

/// Start the provisioned process, wait for it to exit, stop it if it
/// outlives `max_wait`, then tear the remote instance down.
///
/// The handle is closed whether or not any of the steps fail.
pub async fn run_session(
    mut handle: ClientHandle,
    poll_interval: Duration,
    max_wait: Duration,
) -> Result<SessionReport> {
    let result = drive(&handle, poll_interval, max_wait).await;
    handle.close().await;
    result
}

async fn drive(
    handle: &ClientHandle,
    poll_interval: Duration,
    max_wait: Duration,
) -> Result<SessionReport> {
    let start = handle.start().await?;
    let client_id = handle.client_id().unwrap_or_default().to_string();

    let (mut last_status, polls) = if start.is_running() {
        handle.wait_for_exit(poll_interval, max_wait).await?
    } else {
        (start, 0)
    };

    let stopped = last_status.is_running();
    if stopped {
        warn!(
            "Client {} still running after {:?}, stopping it",
            client_id, max_wait
        );
        last_status = handle.stop().await?;
    }

    if last_status.is_abnormal() {
        warn!("Client {} ended abnormally: {:?}", client_id, last_status.status);
    } else {
        info!("Client {} finished: {:?}", client_id, last_status.status);
    }

    Ok(SessionReport {
        client_id,
        start,
        last_status,
        polls,
        stopped,
    })
}
