use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::{
    analyze_dependencies, compute_statistics, module_dependencies, resolve_hierarchy,
    FuzzyMatcher,
};
use crate::types::{
    Declaration, DeclarationKind, DependencyInfo, Hierarchy, LibraryStatistics, Lookup,
    ScanReport, ScoredDeclaration, SourceFile,
};
use crate::Result;

use super::declaration_index::DeclarationIndex;
use super::fingerprint::TreeHasher;
use super::indexer::{build_index_from, IndexConfig};
use super::scanner::scan_directory;

/// A built, read-only declaration index over one source tree plus its query surface.
pub struct DeclarationEngine {
    root: PathBuf,
    index: DeclarationIndex,
    report: ScanReport,
    fingerprint: String,
}

impl DeclarationEngine {
    pub fn build(root: &Path, config: &IndexConfig) -> Result<Self> {
        let started = Instant::now();
        let files = scan_directory(root)?;
        Self::from_files(root, &files, config, started)
    }

    /// Build from an already located file list. `started` is when locating began.
    pub fn from_files(
        root: &Path,
        files: &[SourceFile],
        config: &IndexConfig,
        started: Instant,
    ) -> Result<Self> {
        let fingerprint = TreeHasher::fingerprint(files);
        let build = build_index_from(root, files, config, started)?;
        Ok(Self {
            root: root.to_path_buf(),
            index: build.index,
            report: build.report,
            fingerprint,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn index(&self) -> &DeclarationIndex {
        &self.index
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    pub fn all(&self) -> &[Declaration] {
        self.index.all()
    }

    pub fn by_module(&self, module: &str) -> Vec<&Declaration> {
        self.index.by_module(module)
    }

    pub fn by_kind(&self, kind: DeclarationKind) -> Vec<&Declaration> {
        self.index.by_kind(kind)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Declaration> {
        self.index.find_by_name(name)
    }

    pub fn find_all_by_name(&self, name: &str) -> Vec<&Declaration> {
        self.index.find_all_by_name(name)
    }

    pub fn modules(&self) -> Vec<&str> {
        self.index.modules().collect()
    }

    /// Exact lookup that falls back to up to `suggestions` fuzzy matches.
    pub fn lookup(&self, name: &str, suggestions: usize) -> Lookup<'_> {
        match self.find_by_name(name) {
            Some(declaration) => Lookup::Found(declaration),
            None => Lookup::NotFound {
                name: name.to_string(),
                suggestions: self.fuzzy_search(name, suggestions),
            },
        }
    }

    pub fn fuzzy_search(&self, query: &str, limit: usize) -> Vec<ScoredDeclaration<'_>> {
        FuzzyMatcher::new().search(&self.index, query, limit)
    }

    pub fn hierarchy(&self, name: &str) -> Option<Hierarchy<'_>> {
        resolve_hierarchy(&self.index, name)
    }

    pub fn dependencies(&self) -> Vec<DependencyInfo> {
        analyze_dependencies(&self.index)
    }

    pub fn dependencies_of(&self, module: &str) -> Option<DependencyInfo> {
        module_dependencies(&self.index, module)
    }

    pub fn statistics(&self) -> LibraryStatistics {
        compute_statistics(&self.index, &self.report)
    }
}
