//! element-dev-server - Discover integration elements and serve their UI
//!
//! Facade over [`element_dev_core`]. The interactive binary lives in the
//! `element-dev-cli` crate.
pub use element_dev_core::*;
