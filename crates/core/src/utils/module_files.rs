use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Extensions tried, in order, when looking for a unit's module file
pub const MODULE_EXTENSIONS: &[&str] = &["mjs", "mts", "js", "ts"];

static APP_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+)\.app\.(?P<ext>mts|mjs|ts|js)$").expect("valid app file pattern")
});

/// Candidate module filenames for a unit package directory, in priority
/// order: `{dir}.mjs`, `{dir}.mts`, `{dir}.js`, `{dir}.ts`, then the same
/// extensions for `index`.
pub fn candidate_file_names(dir_name: &str) -> Vec<String> {
    [dir_name, "index"]
        .iter()
        .flat_map(|stem| MODULE_EXTENSIONS.iter().map(move |ext| format!("{stem}.{ext}")))
        .collect()
}

/// Existing candidate module files inside `dir`, in priority order
pub fn existing_module_files(dir: &Path) -> Vec<PathBuf> {
    let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    candidate_file_names(dir_name)
        .into_iter()
        .map(|file| dir.join(file))
        .filter(|path| path.is_file())
        .collect()
}

/// Immediate subdirectories of `dir`, sorted by name. Unreadable entries are
/// skipped.
pub fn list_subdirectories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::trace!("Skipping unreadable entry under {:?}: {}", dir, e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}

/// Parsed `{name}.app.{ext}` filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFile {
    pub path: PathBuf,
    pub name: String,
    pub extension: String,
}

impl AppFile {
    pub fn is_typescript(&self) -> bool {
        matches!(self.extension.as_str(), "mts" | "ts")
    }

    pub fn is_process_internal(&self) -> bool {
        self.name == "process_internal"
    }
}

pub fn parse_app_file_name(path: &Path) -> Option<AppFile> {
    let file_name = path.file_name()?.to_str()?;
    let captures = APP_FILE.captures(file_name)?;
    Some(AppFile {
        path: path.to_path_buf(),
        name: captures["name"].to_string(),
        extension: captures["ext"].to_string(),
    })
}

/// The element's app file, if any. `process_internal.app.*` is preferred,
/// otherwise the first match by name.
pub fn find_app_file(dir: &Path) -> Option<AppFile> {
    let mut apps: Vec<AppFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| parse_app_file_name(entry.path()))
        .collect();

    if let Some(index) = apps.iter().position(AppFile::is_process_internal) {
        return Some(apps.swap_remove(index));
    }
    apps.into_iter().next()
}

/// Main app module served to the UI, in priority order
pub fn find_main_app_module(dir: &Path, element_name: &str) -> Option<PathBuf> {
    [
        format!("{element_name}.app.mts"),
        format!("{element_name}.app.mjs"),
        "process_internal.app.mts".to_string(),
        "process_internal.app.mjs".to_string(),
    ]
    .into_iter()
    .map(|file| dir.join(file))
    .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_order() {
        assert_eq!(
            candidate_file_names("send"),
            vec![
                "send.mjs", "send.mts", "send.js", "send.ts", "index.mjs", "index.mts", "index.js",
                "index.ts"
            ]
        );
    }

    #[test]
    fn test_existing_module_files_in_priority_order() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("send");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("index.ts"), "").unwrap();
        fs::write(dir.join("send.mts"), "").unwrap();
        fs::write(dir.join("readme.md"), "").unwrap();

        let files = existing_module_files(&dir);
        assert_eq!(files, vec![dir.join("send.mts"), dir.join("index.ts")]);
    }

    #[test]
    fn test_list_subdirectories_sorted_dirs_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("c.mjs"), "").unwrap();

        let dirs = list_subdirectories(temp.path());
        assert_eq!(dirs, vec![temp.path().join("a"), temp.path().join("b")]);
    }

    #[test]
    fn test_list_subdirectories_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(list_subdirectories(&temp.path().join("nope")).is_empty());
    }

    #[test]
    fn test_parse_app_file_name() {
        let app = parse_app_file_name(Path::new("/x/slack.app.mjs")).unwrap();
        assert_eq!(app.name, "slack");
        assert!(!app.is_typescript());
        assert!(parse_app_file_name(Path::new("/x/slack.mjs")).is_none());
    }

    #[test]
    fn test_find_app_file_prefers_process_internal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("alpha.app.mjs"), "").unwrap();
        fs::write(temp.path().join("process_internal.app.mts"), "").unwrap();

        let app = find_app_file(temp.path()).unwrap();
        assert!(app.is_process_internal());
        assert!(app.is_typescript());
    }

    #[test]
    fn test_find_main_app_module() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_main_app_module(temp.path(), "slack"), None);

        fs::write(temp.path().join("process_internal.app.mjs"), "").unwrap();
        fs::write(temp.path().join("slack.app.mjs"), "").unwrap();
        assert_eq!(
            find_main_app_module(temp.path(), "slack"),
            Some(temp.path().join("slack.app.mjs"))
        );
    }
}
