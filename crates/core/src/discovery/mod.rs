//! Element discovery: classify, scan, enumerate units, resolve properties

pub mod classifier;
pub mod enumerator;
pub mod properties;
pub mod scanner;

use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::ElementLoader;
use crate::types::ElementInfo;

pub use classifier::{classify, ClassifyMode};
pub use enumerator::{enumerate, units_from_metadata, DEFAULT_UNIT_KEY};
pub use properties::{resolution_for, resolve_properties};
pub use scanner::scan;

/// Find the elements available under `root`.
///
/// When the root is itself an element the result is that single element.
/// Otherwise every scan candidate is classified and the ones that fail are
/// skipped. An empty result is reported as `NoElementsFound`.
pub fn discover_elements(loader: &dyn ElementLoader, root: &Path) -> Result<Vec<ElementInfo>> {
    match classify(loader, root, ClassifyMode::Root) {
        Ok(element) => {
            tracing::debug!("Root {:?} is itself an element", root);
            return Ok(vec![element]);
        }
        Err(e) => tracing::debug!("Root is not an element ({}), scanning children", e),
    }

    let elements: Vec<ElementInfo> = scan(root)?
        .into_iter()
        .filter_map(|candidate| {
            classify(loader, &candidate, ClassifyMode::Candidate)
                .map_err(|e| tracing::debug!("Skipping candidate {:?}: {}", candidate, e))
                .ok()
        })
        .collect();

    if elements.is_empty() {
        return Err(Error::NoElementsFound(root.to_path_buf()));
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceLoader;
    use crate::types::Dialect;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_root_element_is_singleton() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("slack.app.mts"), "export default { app: 'slack' };").unwrap();
        // A child that would otherwise be a candidate
        fs::create_dir(temp.path().join("ui")).unwrap();
        fs::write(temp.path().join("ui").join("index.tsx"), "").unwrap();

        let elements = discover_elements(&SourceLoader::new(), temp.path()).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "slack");
    }

    #[test]
    fn test_children_are_classified_and_failures_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("github")).unwrap();
        fs::write(
            root.join("github").join("github.app.mjs"),
            "export default { app: 'github' };",
        )
        .unwrap();
        fs::create_dir(root.join("scripts")).unwrap();
        fs::write(root.join("scripts").join("build.js"), "run();").unwrap();

        let elements = discover_elements(&SourceLoader::new(), root).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "github");
        assert_eq!(elements[0].element_type, Dialect::Pipedream);
    }

    #[test]
    fn test_no_elements() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs").join("intro.md"), "").unwrap();

        let err = discover_elements(&SourceLoader::new(), temp.path()).unwrap_err();
        assert!(matches!(err, Error::NoElementsFound(_)));
    }
}
