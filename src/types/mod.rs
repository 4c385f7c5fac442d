pub mod analysis;
pub mod declaration;
pub mod error;
pub mod source;

pub use analysis::{
    DependencyInfo, Hierarchy, LibraryStatistics, Lookup, ModuleStats, ParentRef, ParseFailure,
    ScanReport, ScoredDeclaration,
};
pub use declaration::{
    Declaration, DeclarationDetail, DeclarationKind, MemberShape, PropertyInfo, TypeParameter,
    VariableKind,
};
pub use error::{AppError, Result};
pub use source::{Language, SourceFile};
