//! Configuration loader
//!
//! Collects `.element-dev.json` files from the element root up to the home
//! directory and merges them with environment overrides.

use std::path::{Path, PathBuf};

use super::settings::{Config, ConfigLayer, CONFIG_FILE_NAME};
use crate::error::Result;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings for a session rooted at `path`
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let home_dir = std::env::var("HOME").ok().map(PathBuf::from);
        let mut config = Self::load_files(path, home_dir.as_deref())?;
        config.apply(ConfigLayer::from_env()?);
        Ok(config)
    }

    /// Merge config files between `path` and `stop_at` (inclusive) without
    /// consulting the environment. Nearer files override farther ones.
    pub fn load_files(path: &Path, stop_at: Option<&Path>) -> Result<Config> {
        let mut check_path = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };

        let mut layers = Vec::new();
        loop {
            let candidate = check_path.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!("Found config at: {:?}", candidate);
                layers.push(ConfigLayer::load_from_file(&candidate)?);
            }

            if stop_at == Some(check_path) {
                break;
            }
            match check_path.parent() {
                Some(parent) => check_path = parent,
                None => break,
            }
        }

        let mut config = Config::default();
        // Farthest first so the nearest file is applied last
        for layer in layers.into_iter().rev() {
            config.apply(layer);
        }
        Ok(config)
    }
}
