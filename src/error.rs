/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Malformed feed document: {0}")]
    Parse(#[from] quick_xml::DeError),

    #[error("Unparseable timestamp: {0:?}")]
    UnparseableTimestamp(String),

    /// Unique violation on the post link constraint. Expected under
    /// duplicate ingestion; the ingestor swallows it.
    #[error("Post already exists for link: {0}")]
    DuplicatePost(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Usage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether the poll scheduler treats this error as a per-feed failure
    /// to log and retry at the next tick, rather than terminating the
    /// polling loop.
    pub fn is_recoverable_cycle_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::Parse(_) | Self::UnparseableTimestamp(_)
        )
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
