use serde_json::Value;
use std::path::Path;

use crate::types::Dialect;
use crate::utils::find_app_file;

pub const DOFLO_MANIFEST: &str = "doflo.json";
pub const PACKAGE_JSON: &str = "package.json";

/// Detect which dialect a directory conforms to.
///
/// Checks run from the most explicit marker to the loosest one:
/// `doflo.json`, an `n8n` section in `package.json`, an app file, and finally
/// bare `actions/` or `sources/` folders.
pub fn detect_dialect(path: &Path) -> Dialect {
    if !path.is_dir() {
        return Dialect::Unknown;
    }

    if path.join(DOFLO_MANIFEST).is_file() {
        tracing::trace!("Detected doflo manifest in {:?}", path);
        return Dialect::Doflo;
    }

    if has_n8n_section(&path.join(PACKAGE_JSON)) {
        tracing::trace!("Detected n8n package in {:?}", path);
        return Dialect::N8n;
    }

    if let Some(app) = find_app_file(path) {
        tracing::trace!("Detected app file {:?}", app.path);
        return if app.is_process_internal() || app.is_typescript() {
            Dialect::Process
        } else {
            Dialect::Pipedream
        };
    }

    if path.join("actions").is_dir() || path.join("sources").is_dir() {
        return Dialect::Pipedream;
    }

    Dialect::Unknown
}

fn has_n8n_section(package_json: &Path) -> bool {
    let Ok(contents) = std::fs::read_to_string(package_json) else {
        return false;
    };
    match serde_json::from_str::<Value>(&contents) {
        Ok(package) => package.get("n8n").is_some_and(Value::is_object),
        Err(e) => {
            tracing::debug!("Ignoring unreadable {:?}: {}", package_json, e);
            false
        }
    }
}
