use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::loader::ElementLoader;
use crate::resolver::resolve_path_with_ui;
use crate::types::{
    ActionOrSignalUnit, Dialect, DialectHint, ElementInfo, PropertyDescriptor, UnitKind,
};
use crate::utils::find_main_app_module;

/// Schema version of [`LaunchContext`] as served to the UI
pub const LAUNCH_CONTEXT_VERSION: u32 = 1;

/// Kind reported for a selected property
pub const PROPERTY_KIND_UI_VARIANT: &str = "ui-variant";

/// Folder inside an element used as the dev server's working directory
pub const DEV_FOLDER: &str = "dev";

/// Everything the dev server needs for one launch, built fresh per launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchContext {
    pub version: u32,
    pub element_path: PathBuf,
    pub element_name: String,
    pub element_dialect: Dialect,
    pub unit_kind: UnitKind,
    pub unit_key: String,
    pub property_key: Option<String>,
    pub property_kind: Option<String>,
    pub property_ui: Option<String>,
    pub module_path: PathBuf,
    pub ui_directory: PathBuf,
    pub ui_directory_exists: bool,
    pub working_dir: PathBuf,
    pub main_module: Option<PathBuf>,
    pub element_module: Value,
    pub unit_module: Value,
    pub property_module: Value,
}

impl LaunchContext {
    /// Resolve the unit's module and gather the metadata served to the UI
    pub fn prepare(
        loader: &dyn ElementLoader,
        element: &ElementInfo,
        unit: &ActionOrSignalUnit,
        property: Option<&PropertyDescriptor>,
    ) -> Result<Self> {
        let resolved = resolve_path_with_ui(
            loader,
            &element.root_path,
            &unit.key,
            unit.kind,
            unit.ui_ref.as_deref(),
        )?;

        let metadata = loader.load_metadata(
            &element.root_path,
            DialectHint::Known(element.element_type),
        )?;
        let unit_module = match metadata.find_unit(unit.kind, &unit.key) {
            Some(declared) => serde_json::to_value(declared)?,
            None => Value::Null,
        };
        let property_module = match property {
            Some(property) => serde_json::to_value(property)?,
            None => Value::Null,
        };

        let element_dir = element.root_path.clone();
        let ui_directory_exists = resolved.ui_directory.is_dir();
        Ok(Self {
            version: LAUNCH_CONTEXT_VERSION,
            working_dir: working_dir(&element_dir),
            main_module: find_main_app_module(&element_dir, &element.name),
            element_path: element_dir,
            element_name: element.name.clone(),
            element_dialect: element.element_type,
            unit_kind: unit.kind,
            unit_key: unit.key.clone(),
            property_key: property.map(|p| p.key.clone()),
            property_kind: property.map(|_| PROPERTY_KIND_UI_VARIANT.to_string()),
            property_ui: property.and_then(|p| p.ui()).map(str::to_string),
            module_path: resolved.module_path,
            ui_directory: resolved.ui_directory,
            ui_directory_exists,
            element_module: serde_json::to_value(&metadata)?,
            unit_module,
            property_module,
        })
    }

    /// Flat constants exposed to the served UI, in a fixed order.
    /// Missing optional values are `null`.
    pub fn constants(&self) -> Map<String, Value> {
        let path = |p: &Path| Value::String(p.to_string_lossy().into_owned());
        let optional = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);

        let mut constants = Map::new();
        constants.insert("ELEMENT_PATH".into(), path(&self.element_path));
        constants.insert("ELEMENT_TYPE".into(), self.unit_kind.as_str().into());
        constants.insert("ELEMENT_DIALECT".into(), self.element_dialect.as_str().into());
        constants.insert("ELEMENT_NAME".into(), self.element_name.clone().into());
        constants.insert("ACTION_SIGNAL_KEY".into(), self.unit_key.clone().into());
        constants.insert("PROPERTY_KEY".into(), optional(&self.property_key));
        constants.insert("PROPERTY_TYPE".into(), optional(&self.property_kind));
        constants.insert("PROPERTY_UI_PATH".into(), optional(&self.property_ui));
        constants.insert("MODULE_PATH".into(), path(&self.module_path));
        constants.insert("UI_DIRECTORY".into(), path(&self.ui_directory));
        constants.insert("ELEMENT_MODULE".into(), self.element_module.clone());
        constants.insert("CURRENT_ACTION_SIGNAL".into(), self.unit_module.clone());
        constants.insert("SELECTED_PROPERTY".into(), self.property_module.clone());
        constants
    }
}

/// `{element}/dev` when present, else the element directory
pub fn working_dir(element_dir: &Path) -> PathBuf {
    let dev = element_dir.join(DEV_FOLDER);
    if dev.is_dir() {
        dev
    } else {
        element_dir.to_path_buf()
    }
}
