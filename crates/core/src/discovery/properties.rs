use crate::error::Result;
use crate::loader::ElementLoader;
use crate::types::{
    ActionOrSignalUnit, DialectHint, ElementInfo, PropertyResolution, UnitData,
};

/// Decide what, if anything, must be chosen after a unit is selected.
///
/// The element is re-loaded so the answer reflects the files on disk. A unit
/// that can no longer be found resolves to `NoProperties`.
pub fn resolve_properties(
    loader: &dyn ElementLoader,
    element: &ElementInfo,
    unit: &ActionOrSignalUnit,
) -> Result<PropertyResolution> {
    let data = loader.load_metadata(
        &element.root_path,
        DialectHint::Known(element.element_type),
    )?;
    Ok(match data.find_unit(unit.kind, &unit.key) {
        Some(declared) => resolution_for(declared),
        None => {
            tracing::debug!("Unit '{}' not found on reload", unit.key);
            PropertyResolution::NoProperties
        }
    })
}

/// Unit-level UI short-circuits; otherwise collect UI-bearing properties in
/// declaration order.
pub fn resolution_for(unit: &UnitData) -> PropertyResolution {
    if let Some(ui) = unit.ui_ref() {
        return PropertyResolution::HasOwnUi(ui.to_string());
    }

    let choices: Vec<_> = unit
        .props
        .iter()
        .filter(|prop| prop.ui().is_some())
        .cloned()
        .collect();

    if choices.is_empty() {
        PropertyResolution::NoProperties
    } else {
        PropertyResolution::PropertyChoices(choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyDescriptor;

    fn prop(key: &str, ui: Option<&str>) -> PropertyDescriptor {
        let mut prop = PropertyDescriptor::bare(key);
        prop.ui_ref = ui.map(str::to_string);
        prop
    }

    #[test]
    fn test_unit_ui_overrides_property_ui() {
        let mut unit = UnitData::new("a1");
        unit.ui = Some("custom-a1".to_string());
        unit.props = vec![prop("p1", Some("p1-ui"))];
        assert_eq!(
            resolution_for(&unit),
            PropertyResolution::HasOwnUi("custom-a1".to_string())
        );
    }

    #[test]
    fn test_only_ui_properties_are_choices() {
        let mut unit = UnitData::new("a2");
        unit.props = vec![prop("p1", None), prop("p2", Some("p2-ui")), prop("p3", Some(""))];
        assert_eq!(
            resolution_for(&unit),
            PropertyResolution::PropertyChoices(vec![prop("p2", Some("p2-ui"))])
        );
    }

    #[test]
    fn test_no_properties() {
        assert_eq!(
            resolution_for(&UnitData::new("a3")),
            PropertyResolution::NoProperties
        );

        let mut plain = UnitData::new("a4");
        plain.props = vec![prop("p1", None)];
        assert_eq!(resolution_for(&plain), PropertyResolution::NoProperties);
    }
}
