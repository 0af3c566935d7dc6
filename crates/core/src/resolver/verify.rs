use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::ElementLoader;

/// Identity read back from a candidate module file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedModule {
    pub key: String,
    pub ui: Option<String>,
}

/// Load `path` through the loader and return the key it declares
pub fn verify_key(loader: &dyn ElementLoader, path: &Path) -> Result<String> {
    verify_module(loader, path).map(|module| module.key)
}

/// Load `path` and read its declared `key` and optional `ui`.
///
/// A module without a non-empty string `key` is a load failure.
pub fn verify_module(loader: &dyn ElementLoader, path: &Path) -> Result<VerifiedModule> {
    let value = loader.load_module_from_file(path)?;
    let key = value
        .get("key")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| Error::load(path, "module does not declare a key"))?;
    let ui = value
        .get("ui")
        .and_then(Value::as_str)
        .filter(|ui| !ui.is_empty())
        .map(str::to_string);

    Ok(VerifiedModule {
        key: key.to_string(),
        ui,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dialect, DialectHint, ElementModuleData};
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct StaticLoader(HashMap<PathBuf, Value>);

    impl ElementLoader for StaticLoader {
        fn detect_dialect(&self, _path: &Path) -> Dialect {
            Dialect::Unknown
        }

        fn load_metadata(&self, path: &Path, _hint: DialectHint) -> Result<ElementModuleData> {
            Err(Error::NotAnElement(path.to_path_buf()))
        }

        fn load_module_from_file(&self, path: &Path) -> Result<Value> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| Error::load(path, "no such module"))
        }
    }

    fn loader() -> StaticLoader {
        StaticLoader(HashMap::from([
            (PathBuf::from("/a.mjs"), json!({ "key": "alpha", "ui": "alpha-ui" })),
            (PathBuf::from("/b.mjs"), json!({ "name": "nameless" })),
            (PathBuf::from("/c.mjs"), json!({ "key": 42 })),
            (PathBuf::from("/d.mjs"), json!({ "key": "delta", "ui": "" })),
        ]))
    }

    #[test]
    fn test_verify_key() {
        assert_eq!(verify_key(&loader(), Path::new("/a.mjs")).unwrap(), "alpha");
    }

    #[test]
    fn test_verify_module_reads_ui() {
        let loader = loader();
        assert_eq!(
            verify_module(&loader, Path::new("/a.mjs")).unwrap().ui.as_deref(),
            Some("alpha-ui")
        );
        assert_eq!(verify_module(&loader, Path::new("/d.mjs")).unwrap().ui, None);
    }

    #[test]
    fn test_missing_or_invalid_key_is_load_failure() {
        let loader = loader();
        for path in ["/b.mjs", "/c.mjs", "/missing.mjs"] {
            assert!(
                matches!(verify_key(&loader, Path::new(path)), Err(Error::Load { .. })),
                "{path} should fail"
            );
        }
    }
}
