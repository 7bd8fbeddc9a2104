//! Configuration schema, file loading and discovery
//!
//! Sinks are declared under a `fanlog.log` list:
//!
//! ```yaml
//! fanlog:
//!   log:
//!     - level: info
//!       format: text
//!       outType: console
//!     - level: error
//!       format: json
//!       outType: file
//!       outDir: log/errors
//!       maxAge: 72
//!       singleLevel: true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::global;
use crate::level::{Format, OutputKind, Severity};

/// Config files looked up in the working directory, in priority order
pub const CONFIG_FILENAMES: [&str; 2] = ["config.yml", "config.yaml"];

/// One sink entry as it appears in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkConfig {
    pub level: Severity,
    pub format: Format,
    #[serde(default)]
    pub out_type: OutputKind,
    #[serde(default)]
    pub out_dir: String,
    /// Retention age in hours
    #[serde(default)]
    pub max_age: u64,
    #[serde(default)]
    pub max_count: u32,
    #[serde(default)]
    pub single_level: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl SinkConfig {
    /// Create an entry with every optional key at its default
    pub fn new(level: Severity, format: Format) -> Self {
        Self {
            level,
            format,
            out_type: OutputKind::default(),
            out_dir: String::new(),
            max_age: 0,
            max_count: 0,
            single_level: false,
            disabled: false,
        }
    }

    /// The entry used when nothing else is configured
    pub fn fallback() -> Self {
        Self {
            out_type: OutputKind::Console,
            ..Self::new(Severity::Debug, Format::Text)
        }
    }
}

/// Top-level document of a config file
///
/// The namespace is also read under the legacy `emix` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(default, alias = "emix")]
    pub fanlog: NamespaceConfig,
}

/// The `fanlog` namespace of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    #[serde(default)]
    pub log: Vec<SinkConfig>,
}

/// Load the sink list from a config file, choosing the parser by extension
pub fn load_config(path: &Path) -> Result<Vec<SinkConfig>, LogError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let root: RootConfig = match extension {
        "yml" | "yaml" => {
            let content = read_config(path)?;
            serde_yaml_ng::from_str(&content).map_err(|source| LogError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        "toml" => {
            let content = read_config(path)?;
            toml::from_str(&content).map_err(|source| LogError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => return Err(LogError::UnsupportedConfig(path.to_path_buf())),
    };
    Ok(root.fanlog.log)
}

fn read_config(path: &Path) -> Result<String, LogError> {
    std::fs::read_to_string(path).map_err(|e| LogError::io(path, e))
}

/// Find the first conventional config file present in `dir`
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Resolve the sink list for the default logger
///
/// Explicit configs win, then the first conventional config file in `dir`,
/// then the single console fallback.
pub fn discover(dir: &Path, explicit: Vec<SinkConfig>) -> Result<Vec<SinkConfig>, LogError> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    if let Some(path) = find_config_file(dir) {
        let configs = load_config(&path)?;
        if !configs.is_empty() {
            tracing::debug!("Loaded {} sink configs from {}", configs.len(), path.display());
            return Ok(configs);
        }
    }
    Ok(vec![SinkConfig::fallback()])
}

/// A pending replacement of the process-wide logger
#[derive(Debug, Clone, Default)]
pub struct Setup {
    /// Sink configs to install (empty leaves the current logger alone)
    pub configs: Vec<SinkConfig>,
}

impl Setup {
    /// Pick explicit configs, else the configs in `config_path` when that file exists
    pub fn resolve(config_path: Option<&Path>, configs: Vec<SinkConfig>) -> Result<Self, LogError> {
        if !configs.is_empty() {
            return Ok(Self { configs });
        }
        match config_path {
            Some(path) if path.is_file() => Ok(Self {
                configs: load_config(path)?,
            }),
            _ => Ok(Self::default()),
        }
    }

    /// Swap the process-wide logger; returns whether a swap happened
    pub fn apply(self) -> Result<bool, LogError> {
        global::setup(self.configs)
    }
}
