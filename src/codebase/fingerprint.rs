use std::time::UNIX_EPOCH;

use crate::types::SourceFile;

/// Digest of a located file list, used to decide whether a cached index is stale.
pub struct TreeHasher;

impl TreeHasher {
    /// blake3 over sorted `(relative path, size, mtime)` tuples.
    pub fn fingerprint(files: &[SourceFile]) -> String {
        let mut entries: Vec<&SourceFile> = files.iter().collect();
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        let mut hasher = blake3::Hasher::new();
        for file in entries {
            let (size, mtime) = match std::fs::metadata(&file.path) {
                Ok(meta) => {
                    let mtime = meta
                        .modified()
                        .ok()
                        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                        .map(|d| d.as_nanos())
                        .unwrap_or(0);
                    (meta.len(), mtime)
                }
                Err(_) => (0, 0),
            };
            hasher.update(file.relative_path.as_bytes());
            hasher.update(&[0]);
            hasher.update(&size.to_le_bytes());
            hasher.update(&mtime.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn is_stale(old: Option<&str>, files: &[SourceFile]) -> bool {
        match old {
            Some(old) => old != Self::fingerprint(files),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::scan_directory;
    use crate::test_utils::FixtureTree;
    use filetime::FileTime;

    #[test]
    fn test_fingerprint_deterministic() {
        let tree = FixtureTree::new()
            .file("a.ts", "export const a = 1;")
            .file("b/c.ts", "export const c = 1;");
        let files = scan_directory(tree.path()).unwrap();

        let mut reversed = files.clone();
        reversed.reverse();
        assert_eq!(
            TreeHasher::fingerprint(&files),
            TreeHasher::fingerprint(&reversed)
        );
        assert!(!TreeHasher::is_stale(
            Some(&TreeHasher::fingerprint(&files)),
            &files
        ));
    }

    #[test]
    fn test_mtime_change_is_stale() {
        let tree = FixtureTree::new().file("a.ts", "export const a = 1;");
        let files = scan_directory(tree.path()).unwrap();
        let before = TreeHasher::fingerprint(&files);

        filetime::set_file_mtime(
            tree.path().join("a.ts"),
            FileTime::from_unix_time(1_000_000, 0),
        )
        .unwrap();
        assert!(TreeHasher::is_stale(Some(&before), &files));
    }

    #[test]
    fn test_added_file_is_stale() {
        let tree = FixtureTree::new().file("a.ts", "export const a = 1;");
        let before = TreeHasher::fingerprint(&scan_directory(tree.path()).unwrap());

        tree.write("b.ts", "export const b = 2;");
        let after = scan_directory(tree.path()).unwrap();
        assert!(TreeHasher::is_stale(Some(&before), &after));
        assert!(TreeHasher::is_stale(None, &after));
    }
}
