use crate::codebase::parser::syntax::strip_type_arguments;
use crate::codebase::DeclarationIndex;
use crate::types::{Hierarchy, ParentRef};

/// Inheritance view of the first declaration named `name`, or `None` if there is none.
pub fn resolve_hierarchy<'a>(index: &'a DeclarationIndex, name: &str) -> Option<Hierarchy<'a>> {
    let declaration = index.find_by_name(name)?;

    let parents: Vec<String> = declaration.parents().cloned().collect();

    let resolved_parents = parents
        .iter()
        .map(|parent| {
            let target = index.find_by_name(strip_type_arguments(parent));
            ParentRef {
                name: parent.clone(),
                resolved: target.is_some(),
                module: target.map(|d| d.module.clone()),
            }
        })
        .collect();

    let mut children: Vec<String> = Vec::new();
    for child in index.children_of(&declaration.name) {
        if std::ptr::eq(child, declaration) || children.contains(&child.name) {
            continue;
        }
        children.push(child.name.clone());
    }

    Some(Hierarchy {
        declaration,
        parents,
        resolved_parents,
        children,
    })
}
