use crate::types::Language;

pub trait LanguageSupport: Send + Sync {
    fn get_language(&self) -> tree_sitter::Language;
}

pub struct TypeScriptSupport;
impl LanguageSupport for TypeScriptSupport {
    fn get_language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }
}

pub struct TsxSupport;
impl LanguageSupport for TsxSupport {
    fn get_language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    }
}

pub struct JavaScriptSupport;
impl LanguageSupport for JavaScriptSupport {
    fn get_language(&self) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
    }
}

pub fn get_language_support(lang: Language) -> Box<dyn LanguageSupport> {
    match lang {
        Language::TypeScript => Box::new(TypeScriptSupport),
        Language::Tsx => Box::new(TsxSupport),
        Language::JavaScript => Box::new(JavaScriptSupport),
    }
}
