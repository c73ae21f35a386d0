use crate::{
    domain::TaskFilter,
    ports::{AppConfig, ConfigError, ConfigResult, ConfigStore},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    default_filter: Option<TaskFilter>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        let config_path = config_dir.join("task-manager-cli").join("config.json");
        Ok(Self::with_path(config_path))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Writes the default config on first run. An existing file is never touched.
    /// Returns whether a file was written.
    pub async fn init_defaults(&self) -> ConfigResult<bool> {
        if self.exists().await {
            return Ok(false);
        }
        self.save_config(&AppConfig::default()).await?;
        tracing::info!("Wrote default config to {}", self.config_path.display());
        Ok(true)
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", self.config_path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            api_base: config_file.api_base.unwrap_or(defaults.api_base),
            request_timeout_secs: config_file.request_timeout_secs,
            default_filter: config_file.default_filter.unwrap_or(defaults.default_filter),
            log_level: config_file.log_level.unwrap_or(defaults.log_level),
            log_file: config_file.log_file.unwrap_or(defaults.log_file),
        })
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let config_file = ConfigFile {
            api_base: Some(config.api_base.clone()),
            request_timeout_secs: config.request_timeout_secs,
            default_filter: Some(config.default_filter),
            log_level: Some(config.log_level.clone()),
            log_file: Some(config.log_file.clone()),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    async fn exists(&self) -> bool {
        fs::try_exists(&self.config_path).await.unwrap_or(false)
    }
}
