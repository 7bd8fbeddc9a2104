//! Error types for logger construction and configuration loading
//!
//! Log calls themselves never fail; every variant here is a startup failure.

use std::path::PathBuf;

/// Errors raised while building sinks or loading configuration
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open rotating log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("failed to parse YAML config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("failed to parse TOML config {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unsupported config file extension: {}", .0.display())]
    UnsupportedConfig(PathBuf),
    #[error("unknown log level: {0}")]
    UnknownLevel(String),
    #[error("unknown log format: {0}")]
    UnknownFormat(String),
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LogError::Io {
            path: path.into(),
            source,
        }
    }
}
