//! Session configuration: `.element-dev.json` files and environment overrides

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{Config, ConfigLayer, CONFIG_FILE_NAME};
