use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::codebase::{DeclarationEngine, IndexCache, IndexConfig};
use crate::types::AppError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Library source root that tools index by default.
    pub root: PathBuf,
    pub log_level: String,
    /// Number of built engines kept in the LRU.
    pub cache_size: usize,
    /// Build budget in milliseconds. 0 = unlimited.
    pub scan_timeout_ms: u64,
    pub parallel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            log_level: "info".to_string(),
            cache_size: 8,
            scan_timeout_ms: 0,
            parallel: true,
        }
    }
}

impl AppConfig {
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            parallel: self.parallel,
            scan_timeout: (self.scan_timeout_ms > 0)
                .then(|| Duration::from_millis(self.scan_timeout_ms)),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub cache: Arc<IndexCache>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let cache = Arc::new(IndexCache::new(config.cache_size));
        Self { config, cache }
    }

    /// Engine for the configured root, built on the blocking pool when stale.
    pub async fn engine(&self) -> Result<Arc<DeclarationEngine>> {
        let cache = Arc::clone(&self.cache);
        let root = self.config.root.clone();
        let index_config = self.config.index_config();

        tokio::task::spawn_blocking(move || cache.get_or_build(&root, &index_config))
            .await
            .map_err(|e| AppError::Internal(format!("Index build task failed: {}", e)))?
    }

    /// Drop the cached engine so the next query rebuilds it.
    pub fn refresh(&self) -> bool {
        self.cache.invalidate(&self.config.root)
    }
}
