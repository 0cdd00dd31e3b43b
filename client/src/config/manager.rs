use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use super::Config;
use crate::constants::config::{MAIN_FILE, URI_ENV};
use crate::errors::ConfigError;

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    /// Load `<config_dir>/main.toml`, apply the environment override and
    /// validate the result.
    pub async fn new(config_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_configuration(config_dir.as_ref()).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &Path) -> Result<Config, ConfigError> {
        let main_config_path: PathBuf = config_dir.join(MAIN_FILE);
        debug!("Loading config: {}", main_config_path.display());

        let content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })?;

        if let Ok(uri) = std::env::var(URI_ENV) {
            if !uri.is_empty() {
                debug!("{} overrides base_uri from {}", URI_ENV, main_config_path.display());
                config.base_uri = uri;
            }
        }

        config.validate()?;

        info!(
            "Loaded configuration for {} (poll every {}s, max wait {}s)",
            config.base_uri, config.poll_interval_seconds, config.max_wait_seconds
        );

        Ok(config)
    }
}
