pub mod formatter;

pub use formatter::{
    clear_terminal, elements_prompt, error_message, launching_message, loading_message,
    loading_properties_message, loading_units_message, no_elements_message, properties_prompt,
    property_label, running_banner, units_prompt,
};
