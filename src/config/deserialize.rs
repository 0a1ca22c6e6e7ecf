// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates app names and requires at least one environment.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::EnvironmentConfig;
use crate::types::AppName;

pub fn deserialize_app_name<'de, D>(deserializer: D) -> Result<AppName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    AppName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_environments<'de, D>(
    deserializer: D,
) -> Result<NonEmpty<EnvironmentConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let environments: Vec<EnvironmentConfig> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(environments)
        .ok_or_else(|| serde::de::Error::custom("at least one environment is required"))
}
