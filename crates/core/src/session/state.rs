use std::fmt;
use std::path::PathBuf;

use crate::types::{ActionOrSignalUnit, ElementInfo, PropertyDescriptor};

/// Step of the session a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Units,
    Properties,
    Launch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovering elements",
            Stage::Units => "loading actions and signals",
            Stage::Properties => "loading properties",
            Stage::Launch => "launching the dev server",
        };
        f.write_str(name)
    }
}

/// Observable state of a session. Selection moves forward only.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    ElementsReady(Vec<ElementInfo>),
    NoElements { root: PathBuf },
    LoadingUnits,
    UnitsReady(Vec<ActionOrSignalUnit>),
    LoadingProperties,
    PropertiesReady(Vec<PropertyDescriptor>),
    Launching,
    DevServerRunning(RunningServer),
    Error { stage: Stage, message: String },
}

impl SessionState {
    /// States that need no further input from the user
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionState::NoElements { .. }
                | SessionState::DevServerRunning(_)
                | SessionState::Error { .. }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SessionState::Loading
                | SessionState::LoadingUnits
                | SessionState::LoadingProperties
                | SessionState::Launching
        )
    }
}

/// What is being served once the dev server is up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningServer {
    pub url: String,
    pub element: String,
    pub unit: String,
    pub property: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_states() {
        assert!(SessionState::NoElements { root: PathBuf::from("/x") }.is_settled());
        assert!(
            SessionState::Error {
                stage: Stage::Launch,
                message: "boom".into()
            }
            .is_settled()
        );
        assert!(!SessionState::Launching.is_settled());
        assert!(SessionState::Launching.is_loading());
        assert!(!SessionState::UnitsReady(vec![]).is_loading());
    }
}
