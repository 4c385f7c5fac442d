use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::codebase::{DeclarationEngine, IndexConfig};
use crate::config::{AppConfig, AppState};

/// A throwaway source tree for tests.
pub struct FixtureTree {
    pub temp_dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Write `content` at `relative`, creating parent directories.
    pub fn file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        std::fs::write(&path, content).expect("Failed to write fixture file");
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn engine(&self) -> DeclarationEngine {
        DeclarationEngine::build(self.path(), &IndexConfig::default())
            .expect("Failed to build engine for fixture")
    }
}

impl Default for FixtureTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine over a single root-level `index.ts` holding `source`.
pub fn engine_for(source: &str) -> DeclarationEngine {
    FixtureTree::new().file("index.ts", source).engine()
}

/// Server state rooted at a fixture tree.
pub struct TestContext {
    pub state: Arc<AppState>,
    pub tree: FixtureTree, // Kept so the directory lives as long as the context
}

impl TestContext {
    pub fn new(tree: FixtureTree) -> Self {
        let config = AppConfig {
            root: tree.path().to_path_buf(),
            log_level: "debug".to_string(),
            cache_size: 4,
            ..AppConfig::default()
        };
        Self {
            state: Arc::new(AppState::new(config)),
            tree,
        }
    }
}
