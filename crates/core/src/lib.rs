//! element-dev-core - Discovery and resolution engine for integration elements
//!
//! This crate provides functionality to:
//! - Detect element packages (Process, Pipedream, n8n, Doflo) and load their metadata
//! - Enumerate actions and signals and resolve UI-bearing properties
//! - Resolve the source module and UI directory of a selected unit
//! - Drive an interactive session up to the dev server hand-off
pub mod config;
pub mod discovery;
pub mod error;
pub mod launch;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::{Config, ConfigLoader};
pub use discovery::{
    classify, discover_elements, enumerate, resolve_properties, scan, ClassifyMode,
};
pub use launch::{DevServerLauncher, LaunchContext, ServerHandle};
pub use loader::{ElementLoader, SourceLoader};
pub use resolver::{resolve_path, resolve_path_with_ui, verify_key};
pub use session::{LaunchTarget, Session, SessionState, Stage};
