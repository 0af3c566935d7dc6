use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::ElementLoader;
use crate::types::{Dialect, DialectHint, ElementInfo};

/// How strictly a directory is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    /// The session root itself: the sentinel dialect is rejected so that its
    /// children get scanned instead
    Root,
    /// A scan candidate: any recognized dialect is accepted
    Candidate,
}

/// Decide whether `path` is an element package and read its identity
pub fn classify(loader: &dyn ElementLoader, path: &Path, mode: ClassifyMode) -> Result<ElementInfo> {
    if !path.is_dir() {
        return Err(Error::NotAnElement(path.to_path_buf()));
    }

    let dialect = loader.detect_dialect(path);
    let rejected = match mode {
        ClassifyMode::Root => !dialect.is_recognized() || dialect == Dialect::SENTINEL,
        ClassifyMode::Candidate => !dialect.is_recognized(),
    };
    if rejected {
        tracing::debug!("{:?} detected as {}, not an element", path, dialect);
        return Err(Error::NotAnElement(path.to_path_buf()));
    }

    let data = loader.load_metadata(path, DialectHint::Known(dialect))?;
    if data.name.trim().is_empty() {
        return Err(Error::load(path, "element declares an empty name"));
    }

    let root_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Ok(ElementInfo {
        name: data.name,
        element_type: data.element_type,
        root_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceLoader;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_root_accepts_process_element() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("slack.app.mts"),
            "export default { app: 'slack' };",
        )
        .unwrap();

        let info = classify(&SourceLoader::new(), temp.path(), ClassifyMode::Root).unwrap();
        assert_eq!(info.name, "slack");
        assert_eq!(info.element_type, Dialect::Process);
        assert!(info.root_path.is_absolute());
    }

    #[test]
    fn test_root_rejects_sentinel_but_candidate_accepts_it() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("github.app.mjs"),
            "export default { app: 'github' };",
        )
        .unwrap();
        let loader = SourceLoader::new();

        let err = classify(&loader, temp.path(), ClassifyMode::Root).unwrap_err();
        assert!(matches!(err, Error::NotAnElement(_)));

        let info = classify(&loader, temp.path(), ClassifyMode::Candidate).unwrap();
        assert_eq!(info.element_type, Dialect::Pipedream);
    }

    #[test]
    fn test_unrecognized_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("util.js"), "export const x = 1;").unwrap();
        let loader = SourceLoader::new();

        assert!(matches!(
            classify(&loader, temp.path(), ClassifyMode::Root),
            Err(Error::NotAnElement(_))
        ));
        assert!(matches!(
            classify(&loader, temp.path(), ClassifyMode::Candidate),
            Err(Error::NotAnElement(_))
        ));
    }

    #[test]
    fn test_unparseable_metadata_is_load_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("doflo.json"), "{ not json").unwrap();
        let loader = SourceLoader::new();

        for mode in [ClassifyMode::Root, ClassifyMode::Candidate] {
            assert!(matches!(
                classify(&loader, temp.path(), mode),
                Err(Error::Load { .. })
            ));
        }
    }

    #[test]
    fn test_empty_name_is_load_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("doflo.json"), r#"{ "name": "  " }"#).unwrap();
        let err = classify(&SourceLoader::new(), temp.path(), ClassifyMode::Root).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn test_file_is_not_an_element() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.mjs");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            classify(&SourceLoader::new(), &file, ClassifyMode::Candidate),
            Err(Error::NotAnElement(_))
        ));
    }
}
