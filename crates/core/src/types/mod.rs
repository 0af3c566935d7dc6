pub mod dialect;
pub mod element;
pub mod unit;

pub use dialect::{Dialect, DialectHint};
pub use element::{ElementInfo, ElementModuleData};
pub use unit::{
    props_from_value, ActionOrSignalUnit, PropertyDescriptor, PropertyResolution, ResolvedModule,
    UnitData, UnitKind,
};

/// Extensions that mark a file as element source code
pub const SOURCE_EXTENSIONS: &[&str] = &["mjs", "mts", "js", "ts", "tsx", "jsx"];

/// Whether a filename ends in one of [`SOURCE_EXTENSIONS`]
pub fn is_source_file_name(file_name: &str) -> bool {
    SOURCE_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(&format!(".{ext}")))
}
