pub mod analysis;
pub mod codebase;
pub mod config;
pub mod server;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use codebase::{DeclarationEngine, IndexConfig};
pub use config::{AppConfig, AppState};
pub use types::error::{AppError, Result};
