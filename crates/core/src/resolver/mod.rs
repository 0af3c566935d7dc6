//! Locate the source module implementing a selected unit.
//!
//! Subfolder names under `actions/` and `sources/` are only a convention, so
//! every candidate file is loaded and its declared key compared before it is
//! accepted.

pub mod verify;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::loader::ElementLoader;
use crate::types::{ResolvedModule, UnitKind};
use crate::utils::{existing_module_files, list_subdirectories};

pub use verify::{verify_key, verify_module, VerifiedModule};

/// Base folder for UI assets under an element root
pub const UI_FOLDER: &str = "ui";

/// Resolve the module for `key`, taking the UI directory from the matched
/// module's own `ui` field
pub fn resolve_path(
    loader: &dyn ElementLoader,
    element_root: &Path,
    key: &str,
    kind: UnitKind,
) -> Result<ResolvedModule> {
    resolve_path_with_ui(loader, element_root, key, kind, None)
}

/// Resolve the module for `key`. A `known_ui` from already loaded metadata
/// takes precedence over the matched module's `ui` field.
pub fn resolve_path_with_ui(
    loader: &dyn ElementLoader,
    element_root: &Path,
    key: &str,
    kind: UnitKind,
    known_ui: Option<&str>,
) -> Result<ResolvedModule> {
    let element_dir = element_dir(element_root);
    let folder = element_dir.join(kind.folder_name());
    if !folder.is_dir() {
        return Err(Error::FolderNotFound(folder));
    }

    for subdir in list_subdirectories(&folder) {
        for file in existing_module_files(&subdir) {
            let module = match verify_module(loader, &file) {
                Ok(module) => module,
                Err(e) => {
                    tracing::trace!("Candidate {:?} rejected: {}", file, e);
                    continue;
                }
            };
            if module.key != key {
                tracing::trace!("Candidate {:?} declares '{}', not '{}'", file, module.key, key);
                continue;
            }

            let ui = known_ui
                .filter(|ui| !ui.is_empty())
                .map(str::to_string)
                .or(module.ui);
            let resolved = ResolvedModule {
                module_path: absolute(&file),
                ui_directory: ui_directory(&element_dir, ui.as_deref()),
            };
            tracing::debug!("Resolved {} '{}' to {:?}", kind, key, resolved.module_path);
            return Ok(resolved);
        }
    }

    Err(Error::ModuleNotFound {
        key: key.to_string(),
        folder,
    })
}

/// `{element}/ui/{ui}` when a UI is named, else `{element}/ui`
pub fn ui_directory(element_dir: &Path, ui: Option<&str>) -> PathBuf {
    let base = element_dir.join(UI_FOLDER);
    match ui {
        Some(ui) if !ui.is_empty() => base.join(ui),
        _ => base,
    }
}

fn element_dir(element_root: &Path) -> PathBuf {
    let dir = if element_root.is_file() {
        element_root.parent().unwrap_or(element_root)
    } else {
        element_root
    };
    absolute(dir)
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dialect, DialectHint, ElementModuleData};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Loader that answers from memory, keyed by file name; the files only
    /// need to exist so the candidate probing finds them
    struct MemoryLoader(HashMap<&'static str, Value>);

    impl ElementLoader for MemoryLoader {
        fn detect_dialect(&self, _path: &Path) -> Dialect {
            Dialect::Process
        }

        fn load_metadata(&self, path: &Path, _hint: DialectHint) -> Result<ElementModuleData> {
            Err(Error::NotAnElement(path.to_path_buf()))
        }

        fn load_module_from_file(&self, path: &Path) -> Result<Value> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| Error::load(path, "unparseable"))
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_name_independent_match() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("actions/misnamed/misnamed.mts"));
        let loader = MemoryLoader(HashMap::from([("misnamed.mts", json!({ "key": "send" }))]));

        let resolved = resolve_path(&loader, temp.path(), "send", UnitKind::Action).unwrap();
        assert!(resolved.module_path.ends_with("actions/misnamed/misnamed.mts"));
        assert!(resolved.ui_directory.ends_with("ui"));
    }

    #[test]
    fn test_later_candidate_in_same_folder() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("sources/tick/tick.mjs"));
        touch(&temp.path().join("sources/tick/index.ts"));
        let loader = MemoryLoader(HashMap::from([
            ("tick.mjs", json!({ "key": "other" })),
            ("index.ts", json!({ "key": "tick", "ui": "tick-ui" })),
        ]));

        let resolved = resolve_path(&loader, temp.path(), "tick", UnitKind::Signal).unwrap();
        assert!(resolved.module_path.ends_with("sources/tick/index.ts"));
        assert!(resolved.ui_directory.ends_with("ui/tick-ui"));
    }

    #[test]
    fn test_known_ui_wins() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("actions/a1/a1.mts"));
        let loader = MemoryLoader(HashMap::from([("a1.mts", json!({ "key": "a1", "ui": "own" }))]));

        let resolved =
            resolve_path_with_ui(&loader, temp.path(), "a1", UnitKind::Action, Some("custom-a1"))
                .unwrap();
        assert!(resolved.ui_directory.ends_with("ui/custom-a1"));
    }

    #[test]
    fn test_unloadable_candidates_are_skipped() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("actions/broken/broken.js"));
        touch(&temp.path().join("actions/good/index.mjs"));
        let loader = MemoryLoader(HashMap::from([("index.mjs", json!({ "key": "good" }))]));

        let resolved = resolve_path(&loader, temp.path(), "good", UnitKind::Action).unwrap();
        assert!(resolved.module_path.ends_with("actions/good/index.mjs"));
    }

    #[test]
    fn test_folder_not_found() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("sources/tick/tick.mjs"));
        let loader = MemoryLoader(HashMap::new());

        let err = resolve_path(&loader, temp.path(), "tick", UnitKind::Action).unwrap_err();
        assert!(matches!(err, Error::FolderNotFound(folder) if folder.ends_with("actions")));
    }

    #[test]
    fn test_module_not_found() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("actions/send/send.mts"));
        let loader = MemoryLoader(HashMap::from([("send.mts", json!({ "key": "send" }))]));

        let err = resolve_path(&loader, temp.path(), "receive", UnitKind::Action).unwrap_err();
        assert!(matches!(err, Error::ModuleNotFound { ref key, .. } if key == "receive"));
    }

    #[test]
    fn test_file_root_uses_parent() {
        let temp = TempDir::new().unwrap();
        let app = temp.path().join("slack.app.mts");
        touch(&app);
        touch(&temp.path().join("actions/send/send.mts"));
        let loader = MemoryLoader(HashMap::from([("send.mts", json!({ "key": "send" }))]));

        let resolved = resolve_path(&loader, &app, "send", UnitKind::Action).unwrap();
        assert!(resolved.module_path.ends_with("actions/send/send.mts"));
    }

    #[test]
    fn test_ui_directory() {
        let dir = Path::new("/el");
        assert_eq!(ui_directory(dir, None), PathBuf::from("/el/ui"));
        assert_eq!(ui_directory(dir, Some("")), PathBuf::from("/el/ui"));
        assert_eq!(ui_directory(dir, Some("x")), PathBuf::from("/el/ui/x"));
    }
}
