// ABOUTME: Error type for loading and scaffolding harmonia configuration.
// ABOUTME: Collaborator failures live in ops::OpsError; this covers the local side.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::AppNameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error(
        "configuration file not found in {} (looked for harmonia.yml, harmonia.yaml, .harmonia/config.yml)",
        .0.display()
    )]
    ConfigNotFound(PathBuf),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid app name: {0}")]
    InvalidAppName(#[from] AppNameError),

    /// Every problem found, so one edit can fix them all.
    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
