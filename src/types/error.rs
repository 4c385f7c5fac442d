use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Root path not found: {0}")]
    RootNotFound(String),

    #[error("Failed to parse {file}: {message}")]
    FileParse { file: String, message: String },

    #[error("Declaration not found: {0}")]
    NameNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Scan exceeded its time budget of {budget_ms} ms")]
    ScanTimeout { budget_ms: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}
