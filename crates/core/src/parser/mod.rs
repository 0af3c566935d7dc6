//! Element source parsing using tree-sitter

pub mod exports;
pub mod literal;
pub mod source_parser;

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

pub use exports::{extract_exports, find_class_field, ModuleExports};
pub use literal::LiteralEvaluator;
pub use source_parser::{SourceLanguage, SourceParser};

/// Parse a module source and return its merged export value
pub fn parse_module_value(path: &Path, source: &str) -> Result<Value> {
    let mut parser = SourceParser::for_path(path)?;
    let tree = parser.parse(source)?;
    extract_exports(&tree, source)
        .into_module_value()
        .ok_or_else(|| Error::load(path, "module has no literal exports"))
}

/// Parse a module source and evaluate the named class field initializer
pub fn parse_class_field(path: &Path, source: &str, field: &str) -> Result<Value> {
    let mut parser = SourceParser::for_path(path)?;
    let tree = parser.parse(source)?;
    find_class_field(&tree, source, field)
        .ok_or_else(|| Error::load(path, format!("no `{field}` field found")))
}
