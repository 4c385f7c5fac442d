pub mod cache;
pub mod declaration_index;
pub mod engine;
pub mod fingerprint;
pub mod indexer;
pub mod parser;
pub mod scanner;

pub use cache::{CacheStats, IndexCache};
pub use declaration_index::DeclarationIndex;
pub use engine::DeclarationEngine;
pub use fingerprint::TreeHasher;
pub use indexer::{build_index, build_index_from, IndexBuild, IndexConfig};
pub use parser::DeclarationParser;
pub use scanner::{detect_language, is_source_file, module_id, scan_directory};
