//! Compatibility loader: dialect detection and metadata loading.
//!
//! Everything above this layer talks to the [`ElementLoader`] trait, so tests
//! and alternative runtimes can swap the source-reading implementation.

pub mod cache;
pub mod detect;
pub mod source_loader;

use crate::error::Result;
use crate::types::{Dialect, DialectHint, ElementModuleData};
use serde_json::Value;
use std::path::Path;

pub use cache::ModuleCache;
pub use detect::detect_dialect;
pub use source_loader::SourceLoader;

/// Capability that understands element packages and their modules
pub trait ElementLoader: Send + Sync {
    /// Detect the dialect of a directory; `Dialect::Unknown` when nothing matches
    fn detect_dialect(&self, path: &Path) -> Dialect;

    /// Load the element's identity plus its actions and signals
    fn load_metadata(&self, path: &Path, hint: DialectHint) -> Result<ElementModuleData>;

    /// Load one module file and return its exported metadata object
    fn load_module_from_file(&self, path: &Path) -> Result<Value>;
}
