use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata format family an element package conforms to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Process,
    Pipedream,
    N8n,
    Doflo,
    /// Nothing recognizable was found
    Unknown,
}

impl Dialect {
    /// Dialect that is never accepted when classifying the root directory
    /// itself. A root that only looks like a loose component folder is
    /// searched for element children instead.
    pub const SENTINEL: Dialect = Dialect::Pipedream;

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Process => "process",
            Dialect::Pipedream => "pipedream",
            Dialect::N8n => "n8n",
            Dialect::Doflo => "doflo",
            Dialect::Unknown => "unknown",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Dialect::Unknown)
    }

    /// Human readable names of every loadable dialect
    pub fn supported_names() -> &'static [&'static str] {
        &["Pipedream", "n8n", "Doflo", "Process.co"]
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the loader should pick a dialect when loading metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialectHint {
    /// Detect the dialect from the directory contents
    #[default]
    Auto,
    Known(Dialect),
}
