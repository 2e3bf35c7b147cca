/// Errors returned by [`TripStore`](crate::TripStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An update did not carry any field to change.
    #[error(
        "at least one field to update must be provided \
         (description, category, priority, or due_date)"
    )]
    EmptyUpdate,

    /// No trip has the given id.
    #[error("trip '{0}' not found")]
    TripNotFound(String),

    /// No task has the given id.
    #[error("task #{0} not found")]
    TaskNotFound(i64),

    /// A stored value could not be interpreted.
    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    /// The database rejected an operation.
    #[error("database error: {0}")]
    Database(String),

    /// The database file or its directory could not be prepared.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Result type of the store.
pub type Result<T> = std::result::Result<T, StoreError>;
