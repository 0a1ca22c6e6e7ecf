// ABOUTME: Configuration types and parsing for harmonia.yml.
// ABOUTME: Handles YAML parsing, discovery, and validation of the app record.

mod app;
mod backend;
mod deserialize;
mod env_value;
mod init;
mod polling;

pub use app::{
    AppConfig, AppSubtype, ComponentType, EksConfig, EnvironmentConfig, IacType,
    ProviderConfig, ProvisioningState,
};
pub use backend::BackendConfig;
pub use env_value::EnvValue;
pub use init::init_config;
pub use polling::{PollingConfig, ReplicaPolling, RetryConfig, StackPolling};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "harmonia.yml";
pub const CONFIG_FILENAME_ALT: &str = "harmonia.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".harmonia/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    pub app: AppConfig,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Find and load the config file in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => Self::load(&path),
            None => Err(Error::ConfigNotFound(dir.to_path_buf())),
        }
    }

    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig> {
        self.app
            .environment(name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let mut problems = self.polling.problems();
        problems.extend(self.app.problems());
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidConfig(problems))
        }
    }
}
