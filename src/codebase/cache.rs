use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::Result;

use super::engine::DeclarationEngine;
use super::fingerprint::TreeHasher;
use super::indexer::IndexConfig;
use super::scanner::scan_directory;

/// Built engines keyed by canonical root. An entry is reused only while the
/// located files keep the fingerprint it was built from.
pub struct IndexCache {
    cache: Mutex<LruCache<PathBuf, Arc<DeclarationEngine>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IndexCache {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn cache_key(root: &Path) -> PathBuf {
        root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<PathBuf, Arc<DeclarationEngine>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached engine for `root`, rebuilt when the tree changed since it was built.
    pub fn get_or_build(&self, root: &Path, config: &IndexConfig) -> Result<Arc<DeclarationEngine>> {
        let started = Instant::now();
        let key = Self::cache_key(root);
        let files = scan_directory(&key)?;

        if let Some(engine) = self.lock().get(&key) {
            if !TreeHasher::is_stale(Some(engine.fingerprint()), &files) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(engine));
            }
            tracing::debug!(root = %key.display(), "Source tree changed, rebuilding index");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        // Built outside the lock so other roots stay queryable meanwhile.
        let engine = Arc::new(DeclarationEngine::from_files(&key, &files, config, started)?);
        self.lock().put(key, Arc::clone(&engine));
        Ok(engine)
    }

    /// Drop the entry for `root`. Returns whether one was cached.
    pub fn invalidate(&self, root: &Path) -> bool {
        let key = Self::cache_key(root);
        self.lock().pop(&key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: cache.len(),
            capacity: cache.cap().get(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixtureTree;
    use filetime::FileTime;

    #[test]
    fn test_unchanged_tree_reuses_engine() {
        let tree = FixtureTree::new().file("index.ts", "export const a = 1;\n");
        let cache = IndexCache::new(4);
        let config = IndexConfig::default();

        let first = cache.get_or_build(tree.path(), &config).unwrap();
        let second = cache.get_or_build(tree.path(), &config).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_changed_file_triggers_rebuild() {
        let tree = FixtureTree::new().file("index.ts", "export const a = 1;\n");
        let cache = IndexCache::new(4);
        let config = IndexConfig::default();

        let first = cache.get_or_build(tree.path(), &config).unwrap();
        assert!(first.find_by_name("b").is_none());

        tree.write("index.ts", "export const a = 1;\nexport const b = 2;\n");
        filetime::set_file_mtime(
            tree.path().join("index.ts"),
            FileTime::from_unix_time(2_000_000_000, 0),
        )
        .unwrap();

        let second = cache.get_or_build(tree.path(), &config).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.find_by_name("b").is_some());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let tree = FixtureTree::new().file("index.ts", "export const a = 1;\n");
        let cache = IndexCache::new(0);
        let config = IndexConfig::default();

        cache.get_or_build(tree.path(), &config).unwrap();
        assert_eq!(cache.stats().capacity, 1);
        assert!(cache.invalidate(tree.path()));
        assert!(!cache.invalidate(tree.path()));

        cache.get_or_build(tree.path(), &config).unwrap();
        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let cache = IndexCache::new(2);
        assert!(cache
            .get_or_build(Path::new("/no/such/root"), &IndexConfig::default())
            .is_err());
    }
}
