use clap::Parser;
use element_dev_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Discover integration elements and preview their UI with live reload
#[derive(Parser, Debug)]
#[command(name = "element-dev")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:
    RUST_LOG=debug            Enable debug logging
    ELEMENT_DEV_HOST=host     Dev server host (default: localhost)
    ELEMENT_DEV_PORT=port     Dev server port (default: 5173, 0 picks a free port)
    ELEMENT_DEV_TIMEOUT=secs  Timeout for each loading step (default: 30, 0 disables)")]
pub struct Cli {
    /// Directory containing elements (defaults to the current directory)
    pub path: Option<PathBuf>,
}

impl Cli {
    pub fn target(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Make `path` absolute and check that it is an existing directory
pub fn validate_root(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    if !absolute.exists() {
        return Err(Error::InvalidRoot(format!(
            "Path '{}' does not exist.",
            absolute.display()
        )));
    }
    if !absolute.is_dir() {
        return Err(Error::InvalidRoot(format!(
            "'{}' is not a directory.",
            absolute.display()
        )));
    }
    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_target_is_current_dir() {
        let cli = Cli::try_parse_from(["element-dev"]).unwrap();
        assert_eq!(cli.target(), PathBuf::from("."));

        let cli = Cli::try_parse_from(["element-dev", "elements"]).unwrap();
        assert_eq!(cli.target(), PathBuf::from("elements"));
    }

    #[test]
    fn test_validate_root() {
        let temp = TempDir::new().unwrap();
        assert!(validate_root(temp.path()).unwrap().is_absolute());

        let missing = validate_root(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(missing, Error::InvalidRoot(ref m) if m.ends_with("does not exist.")));

        let file = temp.path().join("file.txt");
        std::fs::write(&file, "").unwrap();
        let not_dir = validate_root(&file).unwrap_err();
        assert!(matches!(not_dir, Error::InvalidRoot(ref m) if m.ends_with("is not a directory.")));
    }
}
