use std::path::Path;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::types::{AppError, Declaration, ParseFailure, ScanReport, SourceFile};
use crate::Result;

use super::declaration_index::DeclarationIndex;
use super::parser::DeclarationParser;
use super::scanner::scan_directory;

#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Extract files on the rayon pool. Output is identical either way.
    pub parallel: bool,
    /// Wall-clock budget for one build.
    pub scan_timeout: Option<Duration>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            scan_timeout: None,
        }
    }
}

impl IndexConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = Some(timeout);
        self
    }
}

pub struct IndexBuild {
    pub index: DeclarationIndex,
    pub report: ScanReport,
}

type FileOutcome = std::result::Result<Vec<Declaration>, ParseFailure>;

type Deadline = Option<(Instant, Duration)>;

pub fn build_index(root: &Path, config: &IndexConfig) -> Result<IndexBuild> {
    let started = Instant::now();
    let files = scan_directory(root)?;
    build_index_from(root, &files, config, started)
}

/// Extract declarations from already located files and merge them in file order.
///
/// `started` is when the build began, before `files` were located. Both the
/// scan budget and the reported duration count from it.
pub fn build_index_from(
    root: &Path,
    files: &[SourceFile],
    config: &IndexConfig,
    started: Instant,
) -> Result<IndexBuild> {
    let deadline = config.scan_timeout.map(|budget| (started + budget, budget));
    check_deadline(deadline)?;

    let outcomes: Vec<FileOutcome> = if config.parallel {
        files
            .par_iter()
            .map_init(DeclarationParser::new, |parser, file| {
                extract_file(parser, file, deadline)
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        let mut parser = DeclarationParser::new();
        files
            .iter()
            .map(|file| extract_file(&mut parser, file, deadline))
            .collect::<Result<Vec<_>>>()?
    };

    let mut report = ScanReport::new(root.display().to_string());
    report.files_scanned = files.len();

    let mut index = DeclarationIndex::new();
    for outcome in outcomes {
        match outcome {
            Ok(declarations) => {
                report.files_indexed += 1;
                index.add_batch(declarations);
            }
            Err(failure) => {
                tracing::warn!(
                    file = %failure.file,
                    error = %failure.message,
                    "Skipping malformed source file"
                );
                report.failures.push(failure);
            }
        }
    }

    report.declarations = index.len();
    report.duration_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        root = %report.root,
        files = report.files_scanned,
        declarations = report.declarations,
        failures = report.failures.len(),
        duration_ms = report.duration_ms,
        "Declaration index built"
    );

    Ok(IndexBuild { index, report })
}

fn check_deadline(deadline: Deadline) -> Result<()> {
    match deadline {
        Some((deadline, budget)) if Instant::now() >= deadline => Err(AppError::ScanTimeout {
            budget_ms: budget.as_millis() as u64,
        }),
        _ => Ok(()),
    }
}

fn extract_file(
    parser: &mut DeclarationParser,
    file: &SourceFile,
    deadline: Deadline,
) -> Result<FileOutcome> {
    check_deadline(deadline)?;

    let failure = |message: String| ParseFailure {
        file: file.relative_path.clone(),
        message,
    };

    let bytes = match std::fs::read(&file.path) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(Err(failure(format!("unreadable: {}", e)))),
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => return Ok(Err(failure("not valid UTF-8".to_string()))),
    };

    match parser.parse_file(file, &content) {
        Ok(declarations) => {
            tracing::debug!(
                file = %file.relative_path,
                declarations = declarations.len(),
                "Extracted declarations"
            );
            Ok(Ok(declarations))
        }
        Err(AppError::FileParse { message, .. }) => Ok(Err(failure(message))),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixtureTree;

    fn fixture() -> FixtureTree {
        FixtureTree::new()
            .file(
                "index.ts",
                "export * from './button';\nexport const version = '5.0.0';\n",
            )
            .file(
                "button/index.tsx",
                "export interface ButtonProps { size?: string }\nexport function Button(props: ButtonProps) { return null; }\n",
            )
            .file(
                "theme/token.ts",
                "export type Token = { colorPrimary: string };\nexport enum Mode { Light, Dark }\n",
            )
    }

    #[test]
    fn test_parallel_and_sequential_builds_match() {
        let tree = fixture();
        let parallel = build_index(tree.path(), &IndexConfig::default()).unwrap();
        let sequential = build_index(tree.path(), &IndexConfig::sequential()).unwrap();
        let again = build_index(tree.path(), &IndexConfig::default()).unwrap();

        assert_eq!(parallel.index.all(), sequential.index.all());
        assert_eq!(parallel.index.all(), again.index.all());

        let names: Vec<&str> = parallel.index.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            ["ButtonProps", "Button", "*", "version", "Token", "Mode"]
        );
    }

    #[test]
    fn test_malformed_file_is_reported_not_fatal() {
        let tree = FixtureTree::new()
            .file("a.ts", "export const a = 1;\n")
            .file("b.ts", "export interface Broken {\n")
            .file("c.ts", "export function c(): void {}\n");

        let build = build_index(tree.path(), &IndexConfig::default()).unwrap();
        let names: Vec<&str> = build.index.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);

        assert_eq!(build.report.files_scanned, 3);
        assert_eq!(build.report.files_indexed, 2);
        assert_eq!(build.report.declarations, 2);
        assert_eq!(build.report.failures.len(), 1);
        assert_eq!(build.report.failures[0].file, "b.ts");
    }

    #[test]
    fn test_non_utf8_file_is_a_failure() {
        let tree = FixtureTree::new().file("ok.ts", "export const ok = true;\n");
        std::fs::write(tree.path().join("bad.ts"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let build = build_index(tree.path(), &IndexConfig::sequential()).unwrap();
        assert_eq!(build.index.len(), 1);
        assert_eq!(build.report.failures[0].file, "bad.ts");
    }

    #[test]
    fn test_zero_budget_times_out() {
        let tree = fixture();
        let config = IndexConfig::sequential().with_scan_timeout(Duration::ZERO);
        let err = build_index(tree.path(), &config).err().unwrap();
        assert!(matches!(err, AppError::ScanTimeout { budget_ms: 0 }));
    }

    #[test]
    fn test_budget_covers_directory_walk() {
        // No files to extract: only the walk can spend the budget.
        let tree = FixtureTree::new().file("README.md", "# nothing to index\n");
        let config = IndexConfig::default().with_scan_timeout(Duration::ZERO);
        let err = build_index(tree.path(), &config).err().unwrap();
        assert!(matches!(err, AppError::ScanTimeout { budget_ms: 0 }));

        let files = scan_directory(tree.path()).unwrap();
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(20));
        let config = IndexConfig::default().with_scan_timeout(Duration::from_millis(10));
        let err = build_index_from(tree.path(), &files, &config, started)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::ScanTimeout { budget_ms: 10 }));
    }

    #[test]
    fn test_deeply_nested_initializer_does_not_abort_build() {
        let depth = 20_000;
        let deep = format!(
            "export const deep = {}0{};\n",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let tree = FixtureTree::new()
            .file("a.ts", "export const a = 1;\n")
            .file("deep.ts", &deep);

        let build = build_index(tree.path(), &IndexConfig::default()).unwrap();
        let names: Vec<&str> = build.index.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a", "deep"]);
        assert!(build.report.failures.is_empty());
        assert_eq!(build.report.files_indexed, 2);
    }

    #[test]
    fn test_missing_root_fails_build() {
        let err = build_index(Path::new("/no/such/root"), &IndexConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, AppError::RootNotFound(_)));
    }
}
