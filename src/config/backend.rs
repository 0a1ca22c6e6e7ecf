// ABOUTME: Where the developer-portal backend and catalog live.
// ABOUTME: URLs may be literals or pulled from the environment.

use serde::Deserialize;

use super::EnvValue;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Portal base URL; the AWS apps API is under `/api/aws-apps-backend`.
    pub base_url: EnvValue,

    /// Catalog base URL, defaulting to the portal base URL.
    #[serde(default)]
    pub catalog_url: Option<EnvValue>,

    /// App name of the platform itself, used for platform-scoped secrets.
    pub platform_app_name: String,

    pub platform_region: String,
}

impl BackendConfig {
    pub fn resolve_base_url(&self) -> Result<String> {
        Ok(self.base_url.resolve()?.trim_end_matches('/').to_string())
    }

    pub fn resolve_catalog_url(&self) -> Result<String> {
        match &self.catalog_url {
            Some(url) => Ok(url.resolve()?.trim_end_matches('/').to_string()),
            None => self.resolve_base_url(),
        }
    }
}
