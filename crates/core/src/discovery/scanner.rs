use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::is_source_file_name;

/// Immediate subdirectories of `root` that directly contain at least one
/// source file. Files under `root` are never candidates and unreadable
/// subdirectories are skipped. Candidates are returned sorted by path.
pub fn scan(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let candidates: Vec<PathBuf> = dirs
        .into_iter()
        .filter(|dir| contains_source_files(dir))
        .collect();
    tracing::debug!("Scan of {:?} found {} candidate(s)", root, candidates.len());
    Ok(candidates)
}

fn contains_source_files(dir: &Path) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping unreadable directory {:?}: {}", dir, e);
            return false;
        }
    };
    entries
        .filter_map(|entry| entry.ok())
        .any(|entry| is_source_file_name(&entry.file_name().to_string_lossy()))
}
