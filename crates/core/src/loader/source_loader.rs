use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::cache::{content_hash, ModuleCache};
use super::detect::{self, DOFLO_MANIFEST, PACKAGE_JSON};
use super::ElementLoader;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser;
use crate::types::{
    props_from_value, Dialect, DialectHint, ElementModuleData, PropertyDescriptor, UnitData,
    UnitKind,
};
use crate::utils::{existing_module_files, find_app_file, list_subdirectories};

/// Loader that reads element sources statically with tree-sitter
#[derive(Debug)]
pub struct SourceLoader {
    cache: ModuleCache,
    exclude_folders: Vec<String>,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct DofloManifest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    actions: Vec<UnitData>,
    #[serde(default)]
    signals: Vec<UnitData>,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self {
            cache: ModuleCache::default(),
            exclude_folders: vec!["common".to_string()],
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new().with_exclude_folders(config.exclude_folders.clone())
    }

    /// Unit subfolders skipped while enumerating `actions/` and `sources/`
    pub fn with_exclude_folders(mut self, folders: Vec<String>) -> Self {
        self.exclude_folders = folders;
        self
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    fn load_component_element(&self, path: &Path, dialect: Dialect) -> Result<ElementModuleData> {
        let app = find_app_file(path);
        let app_module = app.as_ref().and_then(|app| {
            self.load_module_from_file(&app.path)
                .map_err(|e| tracing::debug!("App module not readable: {}", e))
                .ok()
        });

        let declared_name = app_module.as_ref().and_then(|module| {
            ["name", "app"]
                .iter()
                .filter_map(|field| module.get(*field).and_then(Value::as_str))
                .find(|name| !name.is_empty())
                .map(str::to_string)
        });
        let name = declared_name
            .or_else(|| app.as_ref().map(|app| app.name.clone()))
            .unwrap_or_else(|| dir_name(path));

        Ok(ElementModuleData {
            name,
            element_type: dialect,
            actions: self.load_units(&path.join(UnitKind::Action.folder_name())),
            signals: self.load_units(&path.join(UnitKind::Signal.folder_name())),
        })
    }

    fn load_units(&self, folder: &Path) -> Vec<UnitData> {
        if !folder.is_dir() {
            return Vec::new();
        }

        let mut units = Vec::new();
        for subdir in list_subdirectories(folder) {
            let name = dir_name(&subdir);
            if self.exclude_folders.iter().any(|excluded| *excluded == name) {
                tracing::trace!("Skipping excluded folder {:?}", subdir);
                continue;
            }

            let unit = existing_module_files(&subdir).into_iter().find_map(|file| {
                match self.load_module_from_file(&file) {
                    Ok(value) => UnitData::from_module(value),
                    Err(e) => {
                        tracing::debug!("Skipping {:?}: {}", file, e);
                        None
                    }
                }
            });
            match unit {
                Some(unit) => units.push(unit),
                None => tracing::debug!("No loadable unit module in {:?}", subdir),
            }
        }
        units
    }

    fn load_doflo(&self, path: &Path) -> Result<ElementModuleData> {
        let manifest_path = path.join(DOFLO_MANIFEST);
        let contents = std::fs::read_to_string(&manifest_path)?;
        let manifest: DofloManifest = serde_json::from_str(&contents)
            .map_err(|e| Error::load(&manifest_path, e.to_string()))?;
        Ok(ElementModuleData {
            name: manifest.name,
            element_type: Dialect::Doflo,
            actions: manifest.actions,
            signals: manifest.signals,
        })
    }

    fn load_n8n(&self, path: &Path) -> Result<ElementModuleData> {
        let package_path = path.join(PACKAGE_JSON);
        let contents = std::fs::read_to_string(&package_path)?;
        let package: Value = serde_json::from_str(&contents)
            .map_err(|e| Error::load(&package_path, e.to_string()))?;

        let name = package
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| dir_name(path));

        let node_paths: Vec<&str> = package
            .pointer("/n8n/nodes")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut actions = Vec::new();
        let mut signals = Vec::new();
        for node in node_paths {
            let Some(file) = n8n_node_source(path, node) else {
                tracing::debug!("n8n node {} not found under {:?}", node, path);
                continue;
            };
            let description = match std::fs::read_to_string(&file)
                .map_err(Error::from)
                .and_then(|source| parser::parse_class_field(&file, &source, "description"))
            {
                Ok(description) => description,
                Err(e) => {
                    tracing::debug!("Skipping n8n node {:?}: {}", file, e);
                    continue;
                }
            };
            let Some((unit, is_trigger)) = unit_from_n8n_description(description) else {
                continue;
            };
            if is_trigger {
                signals.push(unit);
            } else {
                actions.push(unit);
            }
        }

        Ok(ElementModuleData {
            name,
            element_type: Dialect::N8n,
            actions,
            signals,
        })
    }
}

impl ElementLoader for SourceLoader {
    fn detect_dialect(&self, path: &Path) -> Dialect {
        detect::detect_dialect(path)
    }

    fn load_metadata(&self, path: &Path, hint: DialectHint) -> Result<ElementModuleData> {
        if !path.is_dir() {
            return Err(Error::NotAnElement(path.to_path_buf()));
        }
        let dialect = match hint {
            DialectHint::Auto => self.detect_dialect(path),
            DialectHint::Known(dialect) => dialect,
        };
        tracing::debug!("Loading {:?} as {}", path, dialect);

        match dialect {
            Dialect::Process | Dialect::Pipedream => self.load_component_element(path, dialect),
            Dialect::Doflo => self.load_doflo(path),
            Dialect::N8n => self.load_n8n(path),
            Dialect::Unknown => Err(Error::load(path, "unrecognized element format")),
        }
    }

    fn load_module_from_file(&self, path: &Path) -> Result<Value> {
        let source = std::fs::read_to_string(path)?;
        let file_hash = content_hash(&source);
        if let Some(value) = self.cache.get(path, &file_hash) {
            tracing::trace!("Module cache hit: {:?}", path);
            return Ok(value);
        }

        let value = parser::parse_module_value(path, &source)?;
        self.cache.insert(path.to_path_buf(), file_hash, value.clone());
        Ok(value)
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Source file for an `n8n.nodes` entry. Listed paths usually point at build
/// output; when that is missing the TypeScript source is tried.
fn n8n_node_source(root: &Path, listed: &str) -> Option<PathBuf> {
    let direct = root.join(listed);
    if direct.is_file() {
        return Some(direct);
    }
    let source = root
        .join(listed.strip_prefix("dist/").unwrap_or(listed))
        .with_extension("ts");
    source.is_file().then_some(source)
}

fn unit_from_n8n_description(description: Value) -> Option<(UnitData, bool)> {
    let Value::Object(mut fields) = description else {
        return None;
    };
    let key = fields.get("name").and_then(Value::as_str)?.to_string();

    let is_trigger = key.ends_with("Trigger")
        || fields
            .get("group")
            .and_then(Value::as_array)
            .is_some_and(|groups| groups.iter().any(|g| g.as_str() == Some("trigger")));

    let props = fields
        .remove("properties")
        .map(n8n_properties)
        .unwrap_or_default();

    let mut unit = UnitData::new(key);
    unit.name = fields
        .remove("displayName")
        .and_then(|v| v.as_str().map(str::to_string));
    unit.description = fields
        .remove("description")
        .and_then(|v| v.as_str().map(str::to_string));
    unit.props = props;
    fields.remove("name");
    unit.extra = fields;
    Some((unit, is_trigger))
}

fn n8n_properties(properties: Value) -> Vec<PropertyDescriptor> {
    let Value::Array(items) = properties else {
        return Vec::new();
    };
    let keyed: Vec<Value> = items
        .into_iter()
        .filter_map(|item| {
            let Value::Object(mut map) = item else {
                return None;
            };
            let name = map.get("name").cloned()?;
            map.insert("key".to_string(), name);
            Some(Value::Object(map))
        })
        .collect();
    props_from_value(Value::Array(keyed))
}
