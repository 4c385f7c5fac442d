use std::path::{Component, Path};

use ignore::WalkBuilder;

use crate::types::{AppError, Language, SourceFile};

const IGNORE_FILENAME: &str = ".typedexignore";

/// Directory names that never hold library sources, regardless of ignore files.
const EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Enumerate source files under `root` in a stable, name-sorted order.
pub fn scan_directory(root: &Path) -> crate::Result<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(AppError::RootNotFound(root.display().to_string()));
    }

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .add_custom_ignore_filename(IGNORE_FILENAME)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !EXCLUDED_DIRS.contains(&name.as_ref())
        })
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(language) = detect_language(path) else {
            continue;
        };
        let Some(relative_path) = relative_path(root, path) else {
            continue;
        };

        files.push(SourceFile {
            path: path.to_path_buf(),
            module: module_id(&relative_path),
            relative_path,
            language,
        });
    }

    Ok(files)
}

pub fn is_source_file(path: &Path) -> bool {
    detect_language(path).is_some()
}

pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension().and_then(|e| e.to_str())?;

    match ext.to_lowercase().as_str() {
        "ts" | "mts" | "cts" => Some(Language::TypeScript),
        "tsx" => Some(Language::Tsx),
        "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
        _ => None,
    }
}

/// Derive the module id from a `/`-separated path relative to the root.
///
/// Files directly under the root form a module named after the file, with the
/// source extension and any `.d` declaration suffix removed (`index.ts` and
/// `index.d.ts` both give `index`). Every other file belongs to the module named
/// after its top-level directory (`button/style/index.ts` gives `button`).
pub fn module_id(relative_path: &str) -> String {
    let mut parts = relative_path.split('/').filter(|p| !p.is_empty());
    let first = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return first.to_string();
    }

    let stem = match first.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => first,
    };
    stem.strip_suffix(".d").unwrap_or(stem).to_string()
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixtureTree;

    #[test]
    fn test_module_id_rules() {
        assert_eq!(module_id("index.ts"), "index");
        assert_eq!(module_id("types.d.ts"), "types");
        assert_eq!(module_id("theme.config.ts"), "theme.config");
        assert_eq!(module_id("button/index.tsx"), "button");
        assert_eq!(module_id("button/style/token.ts"), "button");
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language(Path::new("a.ts")), Some(Language::TypeScript));
        assert_eq!(detect_language(Path::new("a.d.ts")), Some(Language::TypeScript));
        assert_eq!(detect_language(Path::new("a.TSX")), Some(Language::Tsx));
        assert_eq!(detect_language(Path::new("a.mjs")), Some(Language::JavaScript));
        assert_eq!(detect_language(Path::new("a.json")), None);
        assert!(!is_source_file(Path::new("README.md")));
    }

    #[test]
    fn test_scan_skips_hidden_and_vendor_dirs() {
        let tree = FixtureTree::new()
            .file("index.ts", "export * from './button';")
            .file("button/index.tsx", "export const a = 1;")
            .file("button/README.md", "# docs")
            .file(".cache/leak.ts", "export const leak = 1;")
            .file("node_modules/dep/index.ts", "export const dep = 1;");

        let files = scan_directory(tree.path()).unwrap();
        let rel: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(rel, ["button/index.tsx", "index.ts"]);
        assert_eq!(files[0].module, "button");
        assert_eq!(files[0].language, Language::Tsx);
        assert_eq!(files[1].module, "index");
    }

    #[test]
    fn test_scan_is_sorted_and_stable() {
        let tree = FixtureTree::new()
            .file("zeta.ts", "")
            .file("alpha/b.ts", "")
            .file("alpha/a.ts", "")
            .file("mid.ts", "");

        let first = scan_directory(tree.path()).unwrap();
        let second = scan_directory(tree.path()).unwrap();
        assert_eq!(first, second);

        let rel: Vec<&str> = first.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(rel, ["alpha/a.ts", "alpha/b.ts", "mid.ts", "zeta.ts"]);
    }

    #[test]
    fn test_scan_missing_root() {
        let err = scan_directory(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, AppError::RootNotFound(_)));
    }

    #[test]
    fn test_scan_empty_root_is_not_an_error() {
        let tree = FixtureTree::new().file("notes.txt", "nothing here");
        assert!(scan_directory(tree.path()).unwrap().is_empty());
    }
}
