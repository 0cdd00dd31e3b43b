pub mod manager;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::clients::{CommandRequest, ProxyRequest};
use crate::constants::session;
use crate::errors::ConfigError;
use crate::http::Transport;

pub use manager::ConfigManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_uri: String,
    pub request_timeout_seconds: Option<u64>,
    pub connect_timeout_seconds: Option<u64>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_max_wait")]
    pub max_wait_seconds: u64,
    // Provisioning defaults, overridden field by field from the command line
    #[serde(default)]
    pub proxy: ProxyRequest,
    #[serde(default)]
    pub command: CommandRequest,
}

fn default_poll_interval() -> u64 {
    session::POLL_INTERVAL.as_secs()
}

fn default_max_wait() -> u64 {
    session::MAX_WAIT.as_secs()
}

impl Config {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            request_timeout_seconds: None,
            connect_timeout_seconds: None,
            poll_interval_seconds: default_poll_interval(),
            max_wait_seconds: default_max_wait(),
            proxy: ProxyRequest::default(),
            command: CommandRequest::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_uri).map_err(|e| ConfigError::InvalidValue {
            field: "base_uri".to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_uri".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.max_wait_seconds > session::MAX_WAIT_LIMIT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "max_wait_seconds".to_string(),
                reason: format!("must be at most {}", session::MAX_WAIT_LIMIT_SECS),
            });
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_seconds)
    }

    /// Build the HTTP client. Without configured timeouts requests wait as
    /// long as the server takes.
    pub fn http_client(&self) -> Result<Client, ConfigError> {
        let mut builder = Client::builder();
        if let Some(secs) = self.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.connect_timeout_seconds {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        builder.build().map_err(|e| ConfigError::InvalidValue {
            field: "http client".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn transport(&self) -> Result<Transport, ConfigError> {
        Ok(Transport::with_client(&self.base_uri, self.http_client()?))
    }
}
