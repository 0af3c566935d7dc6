use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::dialect::Dialect;
use super::unit::{UnitData, UnitKind};

/// Identity of one discovered element package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementInfo {
    pub name: String,
    pub element_type: Dialect,
    /// Absolute path to the package directory
    pub root_path: PathBuf,
}

impl ElementInfo {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.element_type)
    }
}

/// Full metadata of an element as produced by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementModuleData {
    pub name: String,
    pub element_type: Dialect,
    #[serde(default)]
    pub actions: Vec<UnitData>,
    #[serde(default)]
    pub signals: Vec<UnitData>,
}

impl ElementModuleData {
    pub fn units(&self, kind: UnitKind) -> &[UnitData] {
        match kind {
            UnitKind::Action => &self.actions,
            UnitKind::Signal => &self.signals,
        }
    }

    pub fn find_unit(&self, kind: UnitKind, key: &str) -> Option<&UnitData> {
        self.units(kind).iter().find(|unit| unit.key == key)
    }
}
