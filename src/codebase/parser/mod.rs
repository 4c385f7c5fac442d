pub mod extractor;
pub mod languages;
pub mod syntax;

use crate::types::{AppError, Declaration, Language, SourceFile};

pub use extractor::{Extractor, DEFAULT_EXPORT_NAME, WILDCARD_EXPORT_NAME};

/// One lazily created extractor per language, owned by a single worker.
#[derive(Default)]
pub struct DeclarationParser {
    typescript: Option<Extractor>,
    tsx: Option<Extractor>,
    javascript: Option<Extractor>,
}

impl DeclarationParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn extractor(&mut self, language: Language) -> crate::Result<&mut Extractor> {
        let slot = match language {
            Language::TypeScript => &mut self.typescript,
            Language::Tsx => &mut self.tsx,
            Language::JavaScript => &mut self.javascript,
        };
        if slot.is_none() {
            *slot = Some(Extractor::new(language)?);
        }
        slot.as_mut()
            .ok_or_else(|| AppError::Internal(format!("No extractor for {}", language)))
    }

    /// Parse one already-read source file with the extractor for its language.
    pub fn parse_file(
        &mut self,
        file: &SourceFile,
        content: &str,
    ) -> crate::Result<Vec<Declaration>> {
        self.extractor(file.language)?
            .extract(content, &file.module, &file.relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(relative: &str, module: &str, language: Language) -> SourceFile {
        SourceFile {
            path: PathBuf::from(relative),
            relative_path: relative.to_string(),
            module: module.to_string(),
            language,
        }
    }

    #[test]
    fn test_parse_file_stamps_module_and_file() {
        let file = source("button/index.ts", "button", Language::TypeScript);
        let decls = DeclarationParser::new()
            .parse_file(&file, "export interface ButtonProps { a: 1 }")
            .unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].module, "button");
        assert_eq!(decls[0].file, "button/index.ts");
    }

    #[test]
    fn test_parse_file_reports_syntax_errors() {
        let file = source("broken.ts", "broken", Language::TypeScript);
        let err = DeclarationParser::new()
            .parse_file(&file, "export const = ;")
            .unwrap_err();
        assert!(matches!(err, AppError::FileParse { .. }));
    }

    #[test]
    fn test_one_parser_handles_every_language() {
        let mut parser = DeclarationParser::new();
        let ts = source("a.ts", "a", Language::TypeScript);
        let tsx = source("b.tsx", "b", Language::Tsx);
        let js = source("c.js", "c", Language::JavaScript);

        assert_eq!(parser.parse_file(&ts, "export type A = string;").unwrap().len(), 1);
        assert_eq!(
            parser
                .parse_file(&tsx, "export const B = () => <div />;")
                .unwrap()[0]
                .name,
            "B"
        );
        assert_eq!(parser.parse_file(&js, "export function c() {}").unwrap()[0].module, "c");
        assert_eq!(parser.parse_file(&ts, "export enum D { X }").unwrap()[0].name, "D");
    }
}
