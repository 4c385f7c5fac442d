//! In-memory declaration index with name, kind, module and parent lookups.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::codebase::parser::syntax::strip_type_arguments;
use crate::types::{Declaration, DeclarationKind};

#[derive(Debug, Default)]
struct ModuleEntry {
    /// Module name as first seen; the map key is its lowercase form.
    name: String,
    members: Vec<usize>,
}

/// Read-only once built. Every secondary map stores positions into `declarations`,
/// so all listings come back in insertion order.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    declarations: Vec<Declaration>,
    by_name: HashMap<String, Vec<usize>>,
    by_kind: HashMap<DeclarationKind, Vec<usize>>,
    by_module: IndexMap<String, ModuleEntry>,
    /// Parent name (generic arguments stripped) to the declarations naming it.
    children: HashMap<String, Vec<usize>>,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration to the index.
    pub fn add(&mut self, declaration: Declaration) {
        let position = self.declarations.len();

        self.by_name
            .entry(declaration.name.clone())
            .or_default()
            .push(position);
        self.by_kind
            .entry(declaration.kind())
            .or_default()
            .push(position);
        self.by_module
            .entry(declaration.module.to_lowercase())
            .or_insert_with(|| ModuleEntry {
                name: declaration.module.clone(),
                members: Vec::new(),
            })
            .members
            .push(position);

        for parent in declaration.parents() {
            let key = strip_type_arguments(parent);
            let entry = self.children.entry(key.to_string()).or_default();
            if entry.last() != Some(&position) {
                entry.push(position);
            }
        }

        self.declarations.push(declaration);
    }

    /// Add multiple declarations to the index.
    pub fn add_batch(&mut self, declarations: impl IntoIterator<Item = Declaration>) {
        for declaration in declarations {
            self.add(declaration);
        }
    }

    pub fn all(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Declarations of one module, matched case-insensitively. Empty if unknown.
    pub fn by_module(&self, module: &str) -> Vec<&Declaration> {
        self.by_module
            .get(&module.to_lowercase())
            .map(|entry| self.resolve(&entry.members))
            .unwrap_or_default()
    }

    pub fn by_kind(&self, kind: DeclarationKind) -> Vec<&Declaration> {
        self.by_kind
            .get(&kind)
            .map(|positions| self.resolve(positions))
            .unwrap_or_default()
    }

    /// First declaration with exactly this name (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Declaration> {
        self.by_name
            .get(name)
            .and_then(|positions| positions.first())
            .map(|&i| &self.declarations[i])
    }

    pub fn find_all_by_name(&self, name: &str) -> Vec<&Declaration> {
        self.by_name
            .get(name)
            .map(|positions| self.resolve(positions))
            .unwrap_or_default()
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.by_module.contains_key(&module.to_lowercase())
    }

    /// Module names in first-seen order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.by_module.values().map(|entry| entry.name.as_str())
    }

    /// `(module, declarations)` groups in first-seen module order.
    pub fn grouped(&self) -> Vec<(&str, Vec<&Declaration>)> {
        self.by_module
            .values()
            .map(|entry| (entry.name.as_str(), self.resolve(&entry.members)))
            .collect()
    }

    /// Declarations whose extends/implements list names `parent`.
    pub fn children_of(&self, parent: &str) -> Vec<&Declaration> {
        self.children
            .get(strip_type_arguments(parent))
            .map(|positions| self.resolve(positions))
            .unwrap_or_default()
    }

    /// Total number of declarations in the index.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn module_count(&self) -> usize {
        self.by_module.len()
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&Declaration> {
        positions.iter().map(|&i| &self.declarations[i]).collect()
    }
}

impl FromIterator<Declaration> for DeclarationIndex {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut index = Self::new();
        index.add_batch(iter);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclarationDetail;

    fn make_decl(name: &str, module: &str, detail: DeclarationDetail) -> Declaration {
        Declaration::new(
            name.to_string(),
            module.to_string(),
            format!("{module}/index.ts"),
            1,
            detail,
        )
    }

    fn interface(name: &str, module: &str, extends: &[&str]) -> Declaration {
        make_decl(
            name,
            module,
            DeclarationDetail::Interface {
                type_parameters: vec![],
                extends: extends.iter().map(|s| s.to_string()).collect(),
                properties: vec![],
                methods: vec![],
            },
        )
    }

    fn function(name: &str, module: &str) -> Declaration {
        make_decl(
            name,
            module,
            DeclarationDetail::Function {
                type_parameters: vec![],
                parameters: vec![],
                return_type: None,
            },
        )
    }

    #[test]
    fn test_find_by_name_returns_first_inserted() {
        let index: DeclarationIndex = [
            function("useToken", "theme"),
            function("useToken", "button"),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.find_by_name("useToken").unwrap().module, "theme");
        assert_eq!(index.find_all_by_name("useToken").len(), 2);
        assert!(index.find_by_name("usetoken").is_none());
    }

    #[test]
    fn test_by_module_is_case_insensitive_and_ordered() {
        let index: DeclarationIndex = [
            interface("A", "Button", &[]),
            function("b", "theme"),
            function("c", "button"),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = index
            .by_module("BUTTON")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, ["A", "c"]);
        assert_eq!(index.modules().collect::<Vec<_>>(), ["Button", "theme"]);
        assert!(index.by_module("missing").is_empty());
        assert_eq!(index.module_count(), 2);
    }

    #[test]
    fn test_grouped_keeps_first_seen_order() {
        let index: DeclarationIndex = [
            function("z", "zeta"),
            function("a", "alpha"),
            function("y", "zeta"),
        ]
        .into_iter()
        .collect();

        let groups: Vec<(&str, Vec<&str>)> = index
            .grouped()
            .into_iter()
            .map(|(m, decls)| (m, decls.iter().map(|d| d.name.as_str()).collect()))
            .collect();
        assert_eq!(groups, [("zeta", vec!["z", "y"]), ("alpha", vec!["a"])]);
    }

    #[test]
    fn test_children_strip_generic_arguments() {
        let index: DeclarationIndex = [
            interface("Base", "core", &[]),
            interface("List", "core", &["Base<string>"]),
            interface("Map", "core", &["Base", "Iterable<T>"]),
        ]
        .into_iter()
        .collect();

        let children: Vec<&str> = index
            .children_of("Base")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(children, ["List", "Map"]);
        assert_eq!(index.children_of("Iterable").len(), 1);
    }

    #[test]
    fn test_children_not_duplicated_for_repeated_parent() {
        let index: DeclarationIndex = [interface("Twice", "core", &["Base<A>", "Base<B>"])]
            .into_iter()
            .collect();
        assert_eq!(index.children_of("Base").len(), 1);
    }

    #[test]
    fn test_by_kind_and_len() {
        let mut index = DeclarationIndex::new();
        assert!(index.is_empty());
        index.add_batch([interface("I", "a", &[]), function("f", "a")]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.by_kind(DeclarationKind::Function)[0].name, "f");
        assert!(index.by_kind(DeclarationKind::Enum).is_empty());
    }
}
