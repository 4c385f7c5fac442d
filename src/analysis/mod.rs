//! Read-only analyses over a built [`DeclarationIndex`](crate::codebase::DeclarationIndex).

pub mod dependencies;
pub mod fuzzy;
pub mod hierarchy;
pub mod statistics;

pub use dependencies::{analyze_dependencies, module_dependencies};
pub use fuzzy::FuzzyMatcher;
pub use hierarchy::resolve_hierarchy;
pub use statistics::compute_statistics;
