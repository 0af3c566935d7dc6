use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Whether a unit is an invokable action or an event source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Action,
    Signal,
}

impl UnitKind {
    /// Folder under the element root that holds units of this kind
    pub fn folder_name(&self) -> &'static str {
        match self {
            UnitKind::Action => "actions",
            UnitKind::Signal => "sources",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Action => "action",
            UnitKind::Signal => "signal",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input field declared by a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ui", default, skip_serializing_if = "Option::is_none")]
    pub ui_ref: Option<String>,
    /// Remaining schema data, opaque to discovery
    #[serde(flatten)]
    pub property_data: Map<String, Value>,
}

impl PropertyDescriptor {
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: None,
            ui_ref: None,
            property_data: Map::new(),
        }
    }

    /// Build a descriptor from the object-map form `{ key: definition }`
    pub fn from_definition(key: &str, definition: Value) -> Self {
        match definition {
            Value::Object(mut map) => {
                map.insert("key".to_string(), Value::String(key.to_string()));
                serde_json::from_value(Value::Object(map))
                    .unwrap_or_else(|_| PropertyDescriptor::bare(key))
            }
            _ => PropertyDescriptor::bare(key),
        }
    }

    /// UI reference, if it is present and non-empty
    pub fn ui(&self) -> Option<&str> {
        self.ui_ref.as_deref().filter(|ui| !ui.is_empty())
    }
}

/// Normalize a declared `props` value into an ordered property list.
///
/// Accepts an array of objects carrying `key`, or an object map of
/// `key -> definition`. Entries that cannot be read are dropped.
pub fn props_from_value(value: Value) -> Vec<PropertyDescriptor> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, definition)| PropertyDescriptor::from_definition(&key, definition))
            .collect(),
        _ => Vec::new(),
    }
}

fn deserialize_props<'de, D>(deserializer: D) -> Result<Vec<PropertyDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(props_from_value(value))
}

/// Metadata of one action or signal as declared by its module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_props",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub props: Vec<PropertyDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UnitData {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            description: None,
            ui: None,
            props: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Read unit metadata out of a loaded module value
    pub fn from_module(value: Value) -> Option<Self> {
        let unit: UnitData = serde_json::from_value(value).ok()?;
        if unit.key.is_empty() {
            return None;
        }
        Some(unit)
    }

    pub fn ui_ref(&self) -> Option<&str> {
        self.ui.as_deref().filter(|ui| !ui.is_empty())
    }
}

/// One selectable behavior exposed by an element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOrSignalUnit {
    pub key: String,
    pub display_name: String,
    pub kind: UnitKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_element_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_ref: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescriptor>,
}

impl ActionOrSignalUnit {
    pub fn from_data(data: &UnitData, kind: UnitKind, owner: PathBuf) -> Self {
        let ui_ref = data.ui_ref().map(str::to_string);
        Self {
            key: data.key.clone(),
            display_name: data.name.clone().unwrap_or_else(|| data.key.clone()),
            kind,
            description: data.description.clone(),
            owner_element_path: owner,
            // Properties only matter when the unit has no UI of its own
            properties: if ui_ref.is_some() {
                Vec::new()
            } else {
                data.props.clone()
            },
            ui_ref,
        }
    }

    pub fn label(&self) -> String {
        match self.kind {
            UnitKind::Action => format!("Action: {}", self.display_name),
            UnitKind::Signal => format!("Signal: {}", self.display_name),
        }
    }
}

/// Outcome of inspecting a unit for UI-bearing properties
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyResolution {
    /// The unit declares its own UI; no property choice is needed
    HasOwnUi(String),
    /// Nothing to choose; launch without a property
    NoProperties,
    /// Properties carrying their own UI variant, in declaration order
    PropertyChoices(Vec<PropertyDescriptor>),
}

/// Concrete source module and UI directory of a selected unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedModule {
    pub module_path: PathBuf,
    /// May not exist; a missing directory means "no custom UI"
    pub ui_directory: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_array_form_keeps_order() {
        let props = props_from_value(json!([
            { "key": "b", "ui": "b-ui" },
            { "key": "a", "type": "string" },
        ]));
        let keys: Vec<_> = props.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(props[0].ui(), Some("b-ui"));
        assert_eq!(props[1].property_data.get("type"), Some(&json!("string")));
    }

    #[test]
    fn test_props_object_form() {
        let props = props_from_value(json!({
            "channel": { "type": "string", "ui": "channel-picker" },
            "app": null,
        }));
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].key, "channel");
        assert_eq!(props[0].ui(), Some("channel-picker"));
        assert_eq!(props[1], PropertyDescriptor::bare("app"));
    }

    #[test]
    fn test_empty_ui_is_ignored() {
        let prop: PropertyDescriptor =
            serde_json::from_value(json!({ "key": "p", "ui": "" })).unwrap();
        assert_eq!(prop.ui(), None);
    }

    #[test]
    fn test_unit_from_module_requires_key() {
        assert!(UnitData::from_module(json!({ "name": "No key" })).is_none());
        assert!(UnitData::from_module(json!({ "key": "" })).is_none());

        let unit = UnitData::from_module(json!({
            "key": "send",
            "name": "Send Message",
            "version": "0.0.1",
            "props": [{ "key": "text" }]
        }))
        .unwrap();
        assert_eq!(unit.key, "send");
        assert_eq!(unit.props.len(), 1);
        assert_eq!(unit.extra.get("version"), Some(&json!("0.0.1")));
    }

    #[test]
    fn test_display_name_falls_back_to_key() {
        let data = UnitData::new("sync");
        let unit = ActionOrSignalUnit::from_data(&data, UnitKind::Signal, PathBuf::from("/el"));
        assert_eq!(unit.display_name, "sync");
        assert_eq!(unit.label(), "Signal: sync");
    }

    #[test]
    fn test_unit_with_ui_drops_properties() {
        let mut data = UnitData::new("a1");
        data.ui = Some("custom-a1".to_string());
        data.props = vec![PropertyDescriptor::bare("p1")];
        let unit = ActionOrSignalUnit::from_data(&data, UnitKind::Action, PathBuf::from("/el"));
        assert_eq!(unit.ui_ref.as_deref(), Some("custom-a1"));
        assert!(unit.properties.is_empty());
    }

    #[test]
    fn test_unit_data_serializes_ui_field_name() {
        let mut prop = PropertyDescriptor::bare("p2");
        prop.ui_ref = Some("p2-ui".to_string());
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json, json!({ "key": "p2", "ui": "p2-ui" }));
    }
}
