//! Error types shared by the persistence layer and the form validation. The
//! coordinator turns both into dialogs, so every `Display` string here ends up
//! in front of the user.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a filled-in form is refused before anything touches storage. The
/// variants are listed in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and author must not be empty.")]
    EmptyText,
    #[error("Year and scores must be valid numbers.")]
    InvalidNumber,
    #[error("Year must be greater than 0 and scores must be between 0 and 5.")]
    OutOfRange,
}

/// Failures reported by the book store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open database at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: OpenFailure,
    },
    #[error("could not prepare the books table")]
    Schema(#[source] rusqlite::Error),
    #[error("failed to {action} book")]
    Query {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not close the database connection")]
    Close(#[source] rusqlite::Error),
    #[error("book has not been saved yet")]
    MissingId,
    #[error("Book {0} not found.")]
    NotFound(i64),
}

/// Underlying cause of a failed open: either the data directory could not be
/// created or SQLite refused the file.
#[derive(Debug, Error)]
pub enum OpenFailure {
    #[error("failed to create data directory: {0}")]
    Directory(#[from] std::io::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub(crate) fn query(action: &'static str, source: rusqlite::Error) -> Self {
        StoreError::Query { action, source }
    }
}
