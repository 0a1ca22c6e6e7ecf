// ABOUTME: Config values that may come from the environment, such as the portal URL.
// ABOUTME: Either a literal or `{ env: VAR, default: ... }`; an empty variable counts as unset.

use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(value) => Ok(value.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_variable_falls_back_to_default() {
        let value = EnvValue::FromEnv {
            var: "HARMONIA_TEST_BLANK_URL".to_string(),
            default: Some("http://localhost:7007".to_string()),
        };
        temp_env::with_var("HARMONIA_TEST_BLANK_URL", Some("  "), || {
            assert_eq!(value.resolve().unwrap(), "http://localhost:7007");
        });
    }

    #[test]
    fn set_variable_wins_over_default() {
        let value = EnvValue::FromEnv {
            var: "HARMONIA_TEST_SET_URL".to_string(),
            default: Some("http://localhost:7007".to_string()),
        };
        temp_env::with_var("HARMONIA_TEST_SET_URL", Some("https://portal"), || {
            assert_eq!(value.resolve().unwrap(), "https://portal");
        });
    }
}
