use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur during element discovery, resolution and launch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid root: {0}")]
    InvalidRoot(String),

    #[error("Not an element: {}", .0.display())]
    NotAnElement(PathBuf),

    #[error("Failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    #[error("No elements found in {}", .0.display())]
    NoElementsFound(PathBuf),

    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("No module with key '{key}' found under {}", folder.display())]
    ModuleNotFound { key: String, folder: PathBuf },

    #[error("Dev server launch failed: {0}")]
    DevServerLaunch(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for element-dev operations
pub type Result<T> = std::result::Result<T, Error>;
