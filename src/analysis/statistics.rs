use std::cmp::Reverse;

use indexmap::IndexMap;

use crate::codebase::DeclarationIndex;
use crate::types::{Declaration, DeclarationKind, LibraryStatistics, ModuleStats, ScanReport};

/// Length of each `top_*` list.
pub const TOP_LIMIT: usize = 10;

pub fn compute_statistics(index: &DeclarationIndex, report: &ScanReport) -> LibraryStatistics {
    let by_kind: IndexMap<DeclarationKind, usize> = DeclarationKind::ALL
        .into_iter()
        .map(|kind| (kind, index.by_kind(kind).len()))
        .collect();

    let by_module = index
        .grouped()
        .into_iter()
        .map(|(module, declarations)| (module.to_string(), module_stats(&declarations)))
        .collect();

    LibraryStatistics {
        total_declarations: index.len(),
        total_files: report.files_scanned,
        total_modules: index.module_count(),
        parse_failures: report.failures.len(),
        by_kind,
        by_module,
        top_interfaces: top_names(index, DeclarationKind::Interface, |d| d.member_count()),
        top_types: top_names(index, DeclarationKind::TypeAlias, |d| d.member_count()),
        top_functions: top_names(index, DeclarationKind::Function, |d| d.parameters().len()),
    }
}

/// Counts for the kinds present in one module, in reporting order.
fn module_stats(declarations: &[&Declaration]) -> ModuleStats {
    let by_kind = DeclarationKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let count = declarations.iter().filter(|d| d.kind() == kind).count();
            (count > 0).then_some((kind, count))
        })
        .collect();

    ModuleStats {
        total: declarations.len(),
        by_kind,
    }
}

/// Names of `kind` by `weight` descending then name ascending, each name once.
fn top_names(
    index: &DeclarationIndex,
    kind: DeclarationKind,
    weight: impl Fn(&Declaration) -> usize,
) -> Vec<String> {
    let mut ranked = index.by_kind(kind);
    ranked.sort_by(|a, b| {
        Reverse(weight(a))
            .cmp(&Reverse(weight(b)))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut names: Vec<String> = Vec::with_capacity(TOP_LIMIT);
    for declaration in ranked {
        if names.len() == TOP_LIMIT {
            break;
        }
        if !names.contains(&declaration.name) {
            names.push(declaration.name.clone());
        }
    }
    names
}
