use element_dev_core::session::{RunningServer, Stage};
use element_dev_core::types::SOURCE_EXTENSIONS;
use element_dev_core::{ActionOrSignalUnit, Dialect, ElementInfo, PropertyDescriptor};
use std::io::Write;
use std::path::Path;

pub fn clear_terminal() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = std::io::stdout().flush();
}

pub fn loading_message(root: &Path) -> String {
    format!("🔍 Searching for elements in {}...", root.display())
}

pub fn elements_prompt(root: &Path, elements: &[ElementInfo]) -> String {
    format!(
        "📁 Directory: {}\nFound {} element(s):",
        root.display(),
        elements.len()
    )
}

pub fn units_prompt(element: &ElementInfo, units: &[ActionOrSignalUnit]) -> String {
    format!(
        "📁 Element: {}\nFound {} action(s)/signal(s):",
        element.name,
        units.len()
    )
}

pub fn properties_prompt(
    element: &ElementInfo,
    unit: &ActionOrSignalUnit,
    properties: &[PropertyDescriptor],
) -> String {
    format!(
        "📁 Element: {}\n📋 Action/Signal: {}\nFound {} property(ies):",
        element.name,
        unit.label(),
        properties.len()
    )
}

pub fn property_label(property: &PropertyDescriptor) -> String {
    match property.ui() {
        Some(ui) => format!("🎨 {} ({})", property.key, ui),
        None => property.key.clone(),
    }
}

pub fn loading_units_message(element: &ElementInfo) -> String {
    format!("🔍 Loading actions and signals for '{}'...", element.name)
}

pub fn loading_properties_message(unit: &ActionOrSignalUnit) -> String {
    format!("🔍 Loading properties for '{}'...", unit.label())
}

pub fn launching_message(selected: &str, root: &Path) -> String {
    format!(
        "🚀 Launching dev server for '{}'...\nDirectory: {}",
        selected,
        root.display()
    )
}

/// Guidance shown when nothing under the root is an element
pub fn no_elements_message(root: &Path) -> String {
    let extensions = SOURCE_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "❌ No valid elements found in: {}\n\
         Make sure the directory contains valid element modules.\n\
         Supported formats: {}\n\
         Supported file types: {}",
        root.display(),
        Dialect::supported_names().join(", "),
        extensions
    )
}

pub fn error_message(root: &Path, stage: Stage, message: &str) -> String {
    format!(
        "❌ Error {} in: {}\n{}\nCheck that the directory contains valid element modules.",
        stage,
        root.display(),
        message
    )
}

pub fn running_banner(running: &RunningServer) -> String {
    let ui_line = match &running.property {
        Some(property) => format!("Property UI: {property}"),
        None => "UI Mode: Action/Signal Level".to_string(),
    };
    format!(
        "Server Running: {}\nElement: {}\nAction/Signal: {}\n{}\nPress Ctrl+C to stop the server",
        running.url, running.element, running.unit, ui_line
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_elements_guidance() {
        let message = no_elements_message(Path::new("/work"));
        assert!(message.starts_with("❌ No valid elements found in: /work"));
        assert!(message.contains("Supported formats: Pipedream, n8n, Doflo, Process.co"));
        assert!(message.contains("Supported file types: .mjs, .mts, .js, .ts, .tsx, .jsx"));
    }

    #[test]
    fn test_running_banner() {
        let mut running = RunningServer {
            url: "http://localhost:5173".to_string(),
            element: "slack".to_string(),
            unit: "Action: Send Message".to_string(),
            property: None,
        };
        let banner = running_banner(&running);
        assert!(banner.contains("Server Running: http://localhost:5173"));
        assert!(banner.contains("UI Mode: Action/Signal Level"));
        assert!(banner.ends_with("Press Ctrl+C to stop the server"));

        running.property = Some("channel".to_string());
        assert!(running_banner(&running).contains("Property UI: channel"));
    }

    #[test]
    fn test_property_label() {
        let mut property = PropertyDescriptor::bare("channel");
        assert_eq!(property_label(&property), "channel");
        property.ui_ref = Some("picker".to_string());
        assert_eq!(property_label(&property), "🎨 channel (picker)");
    }
}
