use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".element-dev.json";

/// Effective settings for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Host the dev server binds to
    pub host: String,
    /// Port the dev server binds to; 0 picks a free port
    pub port: u16,
    /// Upper bound for each discovery/resolution step, in seconds.
    /// `None` disables the timeout.
    pub resolve_timeout_secs: Option<u64>,
    /// Unit folders that never hold actions or signals
    pub exclude_folders: Vec<String>,
    /// Watch the element directory and push reloads
    pub watch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5173,
            resolve_timeout_secs: Some(30),
            exclude_folders: vec!["common".to_string()],
            watch: true,
        }
    }
}

impl Config {
    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout_secs.map(Duration::from_secs)
    }

    /// Apply a layer on top of these settings; fields set in the layer win
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(host) = layer.host {
            self.host = host;
        }
        if let Some(port) = layer.port {
            self.port = port;
        }
        if let Some(timeout) = layer.resolve_timeout_secs {
            // 0 in a config file means "no timeout"
            self.resolve_timeout_secs = (timeout > 0).then_some(timeout);
        }
        if let Some(folders) = layer.exclude_folders {
            self.exclude_folders = folders;
        }
        if let Some(watch) = layer.watch {
            self.watch = watch;
        }
    }
}

/// One `.element-dev.json` file or environment snapshot; every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_folders: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,
}

impl ConfigLayer {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Overrides from `ELEMENT_DEV_*` variables, read through `lookup`
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("ELEMENT_DEV_PORT")
            .map(|raw| {
                raw.parse::<u16>().map_err(|_| {
                    Error::ConfigError(format!("ELEMENT_DEV_PORT is not a valid port: {raw}"))
                })
            })
            .transpose()?;
        let resolve_timeout_secs = lookup("ELEMENT_DEV_TIMEOUT")
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| {
                    Error::ConfigError(format!("ELEMENT_DEV_TIMEOUT is not a number: {raw}"))
                })
            })
            .transpose()?;

        Ok(Self {
            host: lookup("ELEMENT_DEV_HOST"),
            port,
            resolve_timeout_secs,
            ..Self::default()
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }
}
