use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::declaration::{Declaration, DeclarationKind};

/// A parent name together with whether it resolves to a declaration in the index.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ParentRef {
    pub name: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// Inheritance view of one declaration. Borrows from the index it was computed on.
#[derive(Debug, Clone, Serialize)]
pub struct Hierarchy<'a> {
    pub declaration: &'a Declaration,
    pub parents: Vec<String>,
    pub resolved_parents: Vec<ParentRef>,
    pub children: Vec<String>,
}

impl Hierarchy<'_> {
    pub fn is_isolated(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DependencyInfo {
    pub module: String,
    pub exports: Vec<String>,
    pub re_exports_from: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModuleStats {
    pub total: usize,
    pub by_kind: IndexMap<DeclarationKind, usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LibraryStatistics {
    pub total_declarations: usize,
    pub total_files: usize,
    pub total_modules: usize,
    pub parse_failures: usize,
    pub by_kind: IndexMap<DeclarationKind, usize>,
    pub by_module: IndexMap<String, ModuleStats>,
    pub top_interfaces: Vec<String>,
    pub top_types: Vec<String>,
    pub top_functions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredDeclaration<'a> {
    #[serde(flatten)]
    pub declaration: &'a Declaration,
    pub score: u32,
}

/// Outcome of an exact lookup. A missing name is an expected result, not an error.
#[derive(Debug, Clone)]
pub enum Lookup<'a> {
    Found(&'a Declaration),
    NotFound {
        name: String,
        suggestions: Vec<ScoredDeclaration<'a>>,
    },
}

impl<'a> Lookup<'a> {
    pub fn found(&self) -> Option<&'a Declaration> {
        match self {
            Lookup::Found(decl) => Some(decl),
            Lookup::NotFound { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ParseFailure {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub declarations: usize,
    pub failures: Vec<ParseFailure>,
    pub duration_ms: u64,
    pub indexed_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn new(root: String) -> Self {
        Self {
            root,
            files_scanned: 0,
            files_indexed: 0,
            declarations: 0,
            failures: Vec::new(),
            duration_ms: 0,
            indexed_at: Utc::now(),
        }
    }
}
