use crate::error::{Error, Result};
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// Grammar used for an element source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    /// `.ts`, `.mts`, `.js`, `.mjs` and anything else
    TypeScript,
    /// `.tsx` and `.jsx`
    Tsx,
}

impl SourceLanguage {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") | Some("jsx") => SourceLanguage::Tsx,
            _ => SourceLanguage::TypeScript,
        }
    }
}

pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new(language: SourceLanguage) -> Result<Self> {
        let grammar = match language {
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX,
        };
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.into())
            .map_err(|e| Error::TreeSitterError(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    pub fn for_path(path: &Path) -> Result<Self> {
        Self::new(SourceLanguage::from_path(path))
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::ParseError("Failed to parse source code".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(
            SourceLanguage::from_path(&PathBuf::from("a/b.mts")),
            SourceLanguage::TypeScript
        );
        assert_eq!(
            SourceLanguage::from_path(&PathBuf::from("a/b.mjs")),
            SourceLanguage::TypeScript
        );
        assert_eq!(
            SourceLanguage::from_path(&PathBuf::from("ui/Picker.jsx")),
            SourceLanguage::Tsx
        );
    }

    #[test]
    fn test_parse_typescript_module() {
        let mut parser = SourceParser::new(SourceLanguage::TypeScript).unwrap();
        let tree = parser
            .parse("export const key: string = \"doStuff\";")
            .unwrap();
        assert_eq!(tree.root_node().kind(), "program");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_invalid_syntax_still_yields_tree() {
        let mut parser = SourceParser::new(SourceLanguage::TypeScript).unwrap();
        let tree = parser.parse("export default { key: }").unwrap();
        assert!(tree.root_node().has_error());
    }
}
