//! Error types for persistence and configuration

/// Result type alias for IO operations
pub type Result<T> = std::result::Result<T, IoError>;

/// Error type for persistence and configuration operations
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON serialization/deserialization error
    #[error("RON error: {0}")]
    Ron(String),

    /// Project file extension not recognized
    #[error("Unsupported project format: {0}")]
    UnsupportedFormat(String),

    /// Project file written by an incompatible version
    #[error("Project version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build writes
        expected: String,
        /// Version found in the file
        found: String,
    },

    /// Project file exceeds the load size limit
    #[error("Project file too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Actual file size in bytes
        size: u64,
        /// Maximum allowed size in bytes
        limit: u64,
    },

    /// A fixture key that is not a positive integer
    #[error("Invalid fixture id key: {0}")]
    InvalidFixtureKey(String),
}
