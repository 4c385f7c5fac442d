use crate::codebase::DeclarationIndex;
use crate::types::{Declaration, DeclarationKind, DependencyInfo};

/// One entry per module, in first-seen order, including modules without exports.
pub fn analyze_dependencies(index: &DeclarationIndex) -> Vec<DependencyInfo> {
    index
        .grouped()
        .into_iter()
        .map(|(module, declarations)| dependency_info(module, &declarations))
        .collect()
}

/// Dependency view of a single module, matched case-insensitively.
pub fn module_dependencies(index: &DeclarationIndex, module: &str) -> Option<DependencyInfo> {
    if !index.has_module(module) {
        return None;
    }
    let declarations = index.by_module(module);
    let name = declarations
        .first()
        .map(|d| d.module.as_str())
        .unwrap_or(module);
    Some(dependency_info(name, &declarations))
}

fn dependency_info(module: &str, declarations: &[&Declaration]) -> DependencyInfo {
    let mut exports: Vec<String> = Vec::new();
    let mut re_exports_from: Vec<String> = Vec::new();

    for declaration in declarations {
        if declaration.kind() == DeclarationKind::ReExport {
            if let Some(source) = declaration.reexport_source() {
                if !re_exports_from.iter().any(|s| s == source) {
                    re_exports_from.push(source.to_string());
                }
            }
        } else if !exports.contains(&declaration.name) {
            exports.push(declaration.name.clone());
        }
    }

    DependencyInfo {
        module: module.to_string(),
        exports,
        re_exports_from,
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
                r#"
export * from './utils';
export { Button } from './button';
export * as theme from './theme';
export const version = '5.0.0';
"#,
            )
            .file(
                "utils/index.ts",
                "export function noop(): void {}\nexport function noop(a?: unknown): void;\n",
            )
            .file("theme/index.ts", "const hidden = 1;\n")
    }

    #[test]
    fn test_wildcard_reexport_only_lands_in_sources() {
        let engine = fixture().engine();
        let index_module = module_dependencies(engine.index(), "index").unwrap();

        assert_eq!(index_module.exports, ["version"]);
        assert_eq!(
            index_module.re_exports_from,
            ["./utils", "./button", "./theme"]
        );
    }

    #[test]
    fn test_every_module_listed_in_scan_order() {
        let engine = fixture().engine();
        let deps = analyze_dependencies(engine.index());
        let modules: Vec<&str> = deps.iter().map(|d| d.module.as_str()).collect();
        // `theme` has no exported declarations, so it never reaches the index.
        assert_eq!(modules, ["index", "utils"]);
        assert_eq!(deps[1].exports, ["noop"]);
        assert!(deps[1].re_exports_from.is_empty());
    }

    #[test]
    fn test_exports_partition_declarations() {
        let engine = fixture().engine();
        for info in analyze_dependencies(engine.index()) {
            let mut expected: Vec<String> = engine
                .by_module(&info.module)
                .iter()
                .filter(|d| d.kind() != DeclarationKind::ReExport)
                .map(|d| d.name.clone())
                .collect();
            expected.dedup();
            assert_eq!(info.exports, expected);
            assert!(info
                .exports
                .iter()
                .all(|name| !info.re_exports_from.contains(name)));
        }
    }

    #[test]
    fn test_unknown_module_is_none_and_lookup_ignores_case() {
        let engine = fixture().engine();
        assert!(module_dependencies(engine.index(), "missing").is_none());
        assert_eq!(
            module_dependencies(engine.index(), "UTILS").unwrap().module,
            "utils"
        );
    }
}
