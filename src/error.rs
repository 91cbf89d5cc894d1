use thiserror::Error;

/// Main error type for a spreadsheet import run.
/// Aggregates errors from the spreadsheet reader, the database driver and configuration loading.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{0}")]
    WithContextError(String),

    /// The spreadsheet could not be opened or parsed
    #[error("Read spreadsheet failed: {0}")]
    SourceReadError(#[from] crate::spreadsheet::SpreadsheetError),

    /// A target column never received a value
    #[error("Missing value for column '{column}' at line {line}")]
    SchemaMismatchError { line: usize, column: String },

    /// Connection, statement or commit failure
    #[error("Database operation failed: {0}")]
    DatabaseError(#[from] duckdb::Error),

    #[error("Database path is empty, use ':memory:' for a transient database")]
    EmptyDatabasePath,

    #[error("Invalid import spec '{name}': {message}")]
    InvalidSpec { name: String, message: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Invalid sheet pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = ImportError> = std::result::Result<T, E>;

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ImportError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ImportError::WithContextError(format!("{}: {}", message, e)))
    }
}
