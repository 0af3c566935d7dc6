use std::path::Path;

use crate::error::Result;
use crate::loader::ElementLoader;
use crate::types::{ActionOrSignalUnit, DialectHint, ElementInfo, ElementModuleData, UnitKind};

/// Key of the synthetic unit offered when an element declares nothing
pub const DEFAULT_UNIT_KEY: &str = "default";

/// Load an element and list its actions followed by its signals
pub fn enumerate(loader: &dyn ElementLoader, element: &ElementInfo) -> Result<Vec<ActionOrSignalUnit>> {
    let data = loader.load_metadata(
        &element.root_path,
        DialectHint::Known(element.element_type),
    )?;
    Ok(units_from_metadata(&data, &element.root_path))
}

/// Flatten loaded metadata into selectable units, keeping declared order.
/// Never returns an empty list.
pub fn units_from_metadata(data: &ElementModuleData, owner: &Path) -> Vec<ActionOrSignalUnit> {
    let mut units: Vec<ActionOrSignalUnit> = [UnitKind::Action, UnitKind::Signal]
        .into_iter()
        .flat_map(|kind| {
            data.units(kind)
                .iter()
                .map(move |unit| ActionOrSignalUnit::from_data(unit, kind, owner.to_path_buf()))
        })
        .collect();

    if units.is_empty() {
        units.push(default_unit(owner));
    }
    units
}

fn default_unit(owner: &Path) -> ActionOrSignalUnit {
    ActionOrSignalUnit {
        key: DEFAULT_UNIT_KEY.to_string(),
        display_name: "Default Component".to_string(),
        kind: UnitKind::Action,
        description: Some("Default component from element".to_string()),
        owner_element_path: owner.to_path_buf(),
        ui_ref: None,
        properties: Vec::new(),
    }
}
